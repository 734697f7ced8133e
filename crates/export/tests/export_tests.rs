//! Export coordination against the in-memory platform.

use export::coordinator::plan_jobs;
use export::{summarize, ArtifactOutcome, ExportCoordinator, ExportRequest, ExportSettings};
use indicators::{Availability, IndicatorRegistry, IndicatorRequest, RasterProduct};
use platform::{ArtifactKind, ExportPayload, FileFormat};
use raster_expr::Image;
use test_utils::grid::FARIDPUR_2X2;
use test_utils::{
    assert_approx_eq, assert_band_eq, constant_grid, date, datasets, faridpur, modis_ndvi_scene,
    InMemoryPlatform,
};
use verdant_common::{Category, TimeWindow};

fn export_request(category: Category) -> ExportRequest {
    ExportRequest {
        category: category.label().to_string(),
        year: 2019,
        aoi: "Faridpur".to_string(),
        settings: ExportSettings::default(),
    }
}

/// Product whose indicator is 0.5 everywhere.
fn constant_product(category: Category) -> RasterProduct {
    let image = Image::constant(0.5, "indicator")
        .add_bands(Image::constant(3.0, "obs_count"))
        .unwrap()
        .add_bands(Image::constant(1.0, "class"))
        .unwrap();
    RasterProduct::from_image(
        category,
        faridpur(),
        TimeWindow::year(2019).unwrap(),
        Availability::Computed { scenes: 3 },
        image,
    )
}

#[tokio::test]
async fn test_five_artifacts_submitted() {
    let platform = InMemoryPlatform::new(FARIDPUR_2X2);
    let product = constant_product(Category::VegetationIndices);

    let report = ExportCoordinator::new(&platform)
        .export_all(&product, &export_request(Category::VegetationIndices))
        .await;

    assert_eq!(report.submitted(), 5);
    assert_eq!(report.base_name, "VegetationIndices(MODISNDVI-annualmean)2019Faridpur");
    let names: Vec<String> = platform.submitted().iter().map(|j| j.name.clone()).collect();
    for kind in ArtifactKind::all() {
        let expected = format!("{}_{}", report.base_name, kind.suffix());
        assert!(names.contains(&expected), "missing {}", expected);
        assert!(report.handle(*kind).is_some());
    }
}

#[tokio::test]
async fn test_job_parameters() {
    let platform = InMemoryPlatform::new(FARIDPUR_2X2);
    let product = constant_product(Category::Mineral);
    let mut request = export_request(Category::Mineral);
    request.settings = request
        .settings
        .with_panel_input(Some("250"), Some("Colab"));

    ExportCoordinator::new(&platform)
        .export_all(&product, &request)
        .await;

    let main = platform.job(ArtifactKind::Main).unwrap();
    assert_eq!(main.folder, "Colab");
    assert_eq!(main.format, FileFormat::GeoTiff);
    match &main.payload {
        ExportPayload::Raster {
            scale,
            crs,
            max_pixels,
            bands,
            ..
        } => {
            assert_eq!(*scale, 250.0);
            assert_eq!(crs.as_deref(), Some("EPSG:4326"));
            assert_eq!(*max_pixels, 1e13);
            assert_eq!(bands, &vec!["indicator".to_string()]);
        }
        other => panic!("unexpected payload {:?}", other),
    }

    let thumb = platform.job(ArtifactKind::Thumbnail).unwrap();
    match &thumb.payload {
        ExportPayload::Raster { scale, crs, .. } => {
            assert_eq!(*scale, 1000.0);
            assert_eq!(*crs, None);
        }
        other => panic!("unexpected payload {:?}", other),
    }

    let stats = platform.job(ArtifactKind::Stats).unwrap();
    assert_eq!(stats.format, FileFormat::Csv);
}

#[tokio::test]
async fn test_one_failure_does_not_block_others() {
    let platform = InMemoryPlatform::new(FARIDPUR_2X2).failing_artifact(ArtifactKind::Class);
    let product = constant_product(Category::Crops);

    let report = ExportCoordinator::new(&platform)
        .export_all(&product, &export_request(Category::Crops))
        .await;

    assert_eq!(report.submitted(), 4);
    assert_eq!(report.failed(), 1);
    assert!(matches!(
        report.outcome(ArtifactKind::Class),
        Some(ArtifactOutcome::Failed(_))
    ));
    assert!(platform.job(ArtifactKind::Thumbnail).is_some());
}

#[tokio::test]
async fn test_missing_obs_count_is_skipped() {
    let platform = InMemoryPlatform::new(FARIDPUR_2X2);
    let image = Image::constant(0.5, "indicator")
        .add_bands(Image::constant(1.0, "class"))
        .unwrap();
    let product = RasterProduct::from_image(
        Category::Crops,
        faridpur(),
        TimeWindow::year(2019).unwrap(),
        Availability::Computed { scenes: 1 },
        image,
    );

    let report = ExportCoordinator::new(&platform)
        .export_all(&product, &export_request(Category::Crops))
        .await;

    assert_eq!(report.submitted(), 4);
    assert_eq!(report.skipped(), 1);
    assert!(matches!(
        report.outcome(ArtifactKind::ObsCount),
        Some(ArtifactOutcome::Skipped(_))
    ));
    assert!(platform.job(ArtifactKind::ObsCount).is_none());
}

#[tokio::test]
async fn test_constant_stats_table() {
    let platform = InMemoryPlatform::new(FARIDPUR_2X2);
    let product = constant_product(Category::Crops);

    ExportCoordinator::new(&platform)
        .export_all(&product, &export_request(Category::Crops))
        .await;

    let job = platform.job(ArtifactKind::Stats).unwrap();
    let rows = platform.evaluate_table_job(&job).unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    for key in ["min", "max", "mean"] {
        assert_approx_eq!(row[key].as_f64().unwrap(), 0.5, 1e-12);
    }
    assert_eq!(row["Category"], Category::Crops.label());
    assert_eq!(row["Year"], 2019);
    assert_eq!(row["AOI"], "Faridpur");
}

#[tokio::test]
async fn test_summarize_and_thumbnail_of_computed_product() {
    let platform = InMemoryPlatform::new(FARIDPUR_2X2).with_scenes(
        datasets::mod13q1(),
        vec![modis_ndvi_scene(date(2019, 6, 1), constant_grid(4, 5000.0))],
    );
    let product = IndicatorRegistry::new()
        .compute(
            &platform,
            Category::VegetationIndices,
            &IndicatorRequest::new(faridpur(), TimeWindow::year(2019).unwrap()),
        )
        .await
        .unwrap();

    let stats = summarize(&platform, &product, &ExportSettings::default())
        .await
        .unwrap();
    assert_approx_eq!(stats.mean.unwrap(), 0.5, 1e-9);

    ExportCoordinator::new(&platform)
        .export_all(&product, &export_request(Category::VegetationIndices))
        .await;
    let thumb = platform
        .evaluate_raster_job(&platform.job(ArtifactKind::Thumbnail).unwrap())
        .unwrap();
    // NDVI palette midpoint is #a1d99b
    assert_band_eq!(thumb, "vis-red", Some(161.0));
    assert_band_eq!(thumb, "vis-green", Some(217.0));
    assert_band_eq!(thumb, "vis-blue", Some(155.0));

    let class = platform
        .evaluate_raster_job(&platform.job(ArtifactKind::Class).unwrap())
        .unwrap();
    assert_band_eq!(class, "class", Some(2.0));
}

#[test]
fn test_plan_builds_every_job() {
    let product = constant_product(Category::VegetationTrend);
    let planned = plan_jobs(&product, &export_request(Category::VegetationTrend));
    assert_eq!(planned.len(), 5);
    assert!(planned.iter().all(|(_, job)| job.is_ok()));
}

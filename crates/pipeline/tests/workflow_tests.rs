//! The compute-and-export action end to end against the in-memory platform.

use pipeline::{Inspection, PipelineError, RunRequest, Services, Session, Workflow, WorkflowSettings};
use platform::ArtifactKind;
use indicators::Availability;
use test_utils::grid::FARIDPUR_2X2;
use test_utils::{assert_approx_eq, constant_grid, date, datasets, faridpur, modis_ndvi_scene, InMemoryPlatform};
use verdant_common::{Category, CommonError, Coordinate, GaulRegistry, Season};

fn modis_platform() -> InMemoryPlatform {
    InMemoryPlatform::new(FARIDPUR_2X2).with_scenes(
        datasets::mod13q1(),
        vec![modis_ndvi_scene(date(2019, 5, 1), constant_grid(4, 4000.0))],
    )
}

fn request(category: &str, year: i32) -> RunRequest {
    RunRequest {
        category: category.to_string(),
        year,
        season: Season::FullYear,
        scale: None,
        folder: None,
    }
}

fn center() -> Coordinate {
    let (lon, lat) = FARIDPUR_2X2.center(0);
    Coordinate::new(lon, lat)
}

#[tokio::test]
async fn test_run_computes_exports_and_logs_stats() {
    let platform = modis_platform();
    let workflow = Workflow::new(Services::uniform(&platform), WorkflowSettings::default());
    let mut session = Session::new(faridpur());

    let summary = workflow
        .run(&mut session, &request("vegetation-indices", 2019))
        .await
        .unwrap();

    assert_eq!(summary.category, Category::VegetationIndices);
    assert_eq!(summary.availability, Availability::Computed { scenes: 1 });
    assert_eq!(summary.export.submitted(), 5);
    assert_eq!(platform.size_calls(), 1);
    assert!(session.last_product().is_some());

    let stats = summary.stats.unwrap();
    assert_approx_eq!(stats.mean.unwrap(), 0.4, 1e-9);
}

#[tokio::test]
async fn test_panel_input_reaches_jobs() {
    let platform = modis_platform();
    let workflow = Workflow::new(Services::uniform(&platform), WorkflowSettings::default());
    let mut session = Session::new(faridpur());
    let mut req = request("vegetation-indices", 2019);
    req.scale = Some("500m".to_string());
    req.folder = Some("   ".to_string());

    workflow.run(&mut session, &req).await.unwrap();

    let main = platform.job(ArtifactKind::Main).unwrap();
    assert_eq!(main.scale(), Some(500.0));
    assert_eq!(main.folder, "GEE_Exports");
    let thumb = platform.job(ArtifactKind::Thumbnail).unwrap();
    assert_eq!(thumb.scale(), Some(2000.0));
}

#[tokio::test]
async fn test_unknown_category_is_a_notice_without_side_effects() {
    let platform = modis_platform();
    let workflow = Workflow::new(Services::uniform(&platform), WorkflowSettings::default());
    let mut session = Session::new(faridpur());

    let err = workflow
        .run(&mut session, &request("Phenology (MODIS)", 2019))
        .await
        .unwrap_err();

    assert!(err.is_notice());
    assert_eq!(platform.size_calls(), 0);
    assert!(platform.submitted().is_empty());
    assert!(session.last_product().is_none());
}

#[tokio::test]
async fn test_invalid_year() {
    let platform = modis_platform();
    let workflow = Workflow::new(Services::uniform(&platform), WorkflowSettings::default());
    let mut session = Session::new(faridpur());

    let err = workflow
        .run(&mut session, &request("crops", 2012))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Common(CommonError::InvalidYear { year: 2012, .. })
    ));
    assert_eq!(platform.size_calls(), 0);
}

#[tokio::test]
async fn test_stats_failure_does_not_fail_run() {
    let platform = modis_platform().failing_reduce();
    let workflow = Workflow::new(Services::uniform(&platform), WorkflowSettings::default());
    let mut session = Session::new(faridpur());

    let summary = workflow
        .run(&mut session, &request("vegetation-indices", 2019))
        .await
        .unwrap();

    assert!(summary.stats.is_none());
    assert_eq!(summary.export.submitted(), 5);
}

#[tokio::test]
async fn test_inspector_before_compute() {
    let platform = modis_platform();
    let workflow = Workflow::new(Services::uniform(&platform), WorkflowSettings::default());
    let session = Session::new(faridpur());

    let inspection = workflow.inspect(&session, center(), None).await.unwrap();

    assert_eq!(inspection, Inspection::NothingComputed);
    assert_eq!(platform.reduce_calls(), 0);
}

#[tokio::test]
async fn test_inspector_samples_last_product() {
    let platform = modis_platform();
    let workflow = Workflow::new(Services::uniform(&platform), WorkflowSettings::default());
    let mut session = Session::new(faridpur());
    workflow
        .run(&mut session, &request("vegetation-indices", 2019))
        .await
        .unwrap();

    let inspection = workflow.inspect(&session, center(), Some("250")).await.unwrap();

    match inspection {
        Inspection::Sampled { coordinate, values } => {
            assert_eq!(coordinate, center());
            assert_approx_eq!(values["indicator"].unwrap(), 0.4, 1e-9);
            assert_eq!(values["obs_count"], Some(1.0));
            assert_eq!(values["class"], Some(1.0));
        }
        other => panic!("expected a sample, got {:?}", other),
    }
}

#[tokio::test]
async fn test_region_change_invalidates_product() {
    let platform = modis_platform();
    let workflow = Workflow::new(Services::uniform(&platform), WorkflowSettings::default());
    let mut session = Session::new(faridpur());
    workflow
        .run(&mut session, &request("vegetation-indices", 2019))
        .await
        .unwrap();

    session.select_region(&GaulRegistry, "Dhaka").unwrap();

    let inspection = workflow.inspect(&session, center(), None).await.unwrap();
    assert_eq!(inspection, Inspection::NothingComputed);
}

#[test]
fn test_plan_submits_nothing() {
    let platform = modis_platform();
    let workflow = Workflow::new(Services::uniform(&platform), WorkflowSettings::default());
    let session = Session::new(faridpur());

    let plan = workflow
        .plan(&session, &request("mineral", 2019))
        .unwrap();
    let again = workflow
        .plan(&session, &request("mineral", 2019))
        .unwrap();

    assert_eq!(plan.category, Category::Mineral);
    assert_eq!(plan.jobs.len(), 5);
    assert!(plan.skipped.is_empty());
    assert_eq!(plan.fingerprint, again.fingerprint);
    assert_eq!(platform.size_calls(), 0);
    assert!(platform.submitted().is_empty());
}

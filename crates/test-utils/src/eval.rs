//! Reference evaluator of the expression graph over a small in-memory grid.
//!
//! Semantics follow the remote service closely enough for property tests:
//! masked pixels are `None`, reducers skip them, `where` and `unmask` can
//! turn them valid again. Admin boundaries cover the whole grid.

use std::collections::HashMap;

use platform::ReducedValues;
use raster_expr::{
    BinaryOp, CollectionExpr, CollectionReducer, ImageExpr, Operand, PixelType, RegionReducer,
    RegionReduction, SceneOp, VIS_BANDS,
};
use verdant_common::Geometry;

use crate::fixtures::{GridSpec, Scene};

pub type Pixels = Vec<Option<f64>>;

/// Error message of a failed evaluation.
pub type EvalResult<T> = Result<T, String>;

/// An evaluated multi-band image.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pub bands: Vec<(String, Pixels)>,
}

impl Raster {
    pub fn names(&self) -> Vec<&str> {
        self.bands.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn band(&self, name: &str) -> Option<&Pixels> {
        self.bands.iter().find(|(n, _)| n == name).map(|(_, p)| p)
    }

    /// Value of `band` at pixel `index`; `None` when masked or absent.
    pub fn value(&self, band: &str, index: usize) -> Option<f64> {
        self.band(band).and_then(|p| p.get(index).copied().flatten())
    }

    fn require(&self, name: &str) -> EvalResult<&Pixels> {
        self.band(name)
            .ok_or_else(|| format!("band '{}' not found in {:?}", name, self.names()))
    }

    fn map(self, f: impl Fn(Option<f64>) -> Option<f64>) -> Raster {
        Raster {
            bands: self
                .bands
                .into_iter()
                .map(|(n, p)| (n, p.into_iter().map(&f).collect()))
                .collect(),
        }
    }
}

pub struct Evaluator<'a> {
    spec: &'a GridSpec,
    catalog: &'a HashMap<String, Vec<Scene>>,
}

impl<'a> Evaluator<'a> {
    pub fn new(spec: &'a GridSpec, catalog: &'a HashMap<String, Vec<Scene>>) -> Self {
        Self { spec, catalog }
    }

    /// Scenes an expression resolves to, in catalog order.
    pub fn collection(&self, expr: &CollectionExpr) -> EvalResult<Vec<Scene>> {
        match expr {
            CollectionExpr::Query {
                dataset, window, ..
            } => Ok(self
                .catalog
                .get(dataset)
                .map(|scenes| {
                    scenes
                        .iter()
                        .filter(|s| window.contains(&s.date))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()),
            CollectionExpr::Filter { input, filter } => Ok(self
                .collection(input)?
                .into_iter()
                .filter(|s| {
                    s.properties
                        .get(&filter.property)
                        .is_some_and(|v| *v < filter.max)
                })
                .collect()),
            CollectionExpr::Map { input, scene_op } => self
                .collection(input)?
                .into_iter()
                .map(|s| apply_scene_op(s, scene_op))
                .collect(),
        }
    }

    pub fn image(&self, expr: &ImageExpr) -> EvalResult<Raster> {
        let len = self.spec.len();
        match expr {
            ImageExpr::Constant { value, band } => Ok(Raster {
                bands: vec![(band.clone(), vec![Some(*value); len])],
            }),
            ImageExpr::Reduce {
                collection,
                reducer,
            } => {
                let scenes = self.collection(collection)?;
                let first = scenes
                    .first()
                    .ok_or_else(|| "cannot reduce an empty collection".to_string())?;
                let mut bands = Vec::new();
                for (name, _) in &first.bands {
                    let mut out = Vec::with_capacity(len);
                    for i in 0..len {
                        let values: Vec<f64> = scenes
                            .iter()
                            .filter_map(|s| s.get(name).and_then(|p| p.get(i).copied().flatten()))
                            .collect();
                        out.push(reduce_values(*reducer, values));
                    }
                    bands.push((name.clone(), out));
                }
                Ok(Raster { bands })
            }
            ImageExpr::Select { input, bands } => {
                let raster = self.image(input)?;
                let mut out = Vec::new();
                for band in bands {
                    out.push((band.clone(), raster.require(band)?.clone()));
                }
                Ok(Raster { bands: out })
            }
            ImageExpr::Rename { input, names } => {
                let raster = self.image(input)?;
                if raster.bands.len() != names.len() {
                    return Err(format!("rename of {} bands to {:?}", raster.bands.len(), names));
                }
                Ok(Raster {
                    bands: raster
                        .bands
                        .into_iter()
                        .zip(names)
                        .map(|((_, p), n)| (n.clone(), p))
                        .collect(),
                })
            }
            ImageExpr::AddBands { input, other } => {
                let mut raster = self.image(input)?;
                raster.bands.extend(self.image(other)?.bands);
                Ok(raster)
            }
            ImageExpr::Binary { op, lhs, rhs } => {
                let left = self.image(lhs)?;
                match rhs {
                    Operand::Scalar(b) => Ok(left.map(|a| a.and_then(|a| op.apply(a, *b)))),
                    Operand::Image(rhs) => {
                        let right = self.image(rhs)?;
                        binary_images(*op, left, &right)
                    }
                }
            }
            ImageExpr::Where {
                input,
                condition,
                value,
            } => {
                let raster = self.image(input)?;
                let cond = self.image(condition)?;
                let cond = cond
                    .bands
                    .first()
                    .map(|(_, p)| p.clone())
                    .ok_or_else(|| "empty condition".to_string())?;
                Ok(Raster {
                    bands: raster
                        .bands
                        .into_iter()
                        .map(|(n, p)| {
                            let p = p
                                .into_iter()
                                .zip(&cond)
                                .map(|(v, c)| match c {
                                    Some(c) if *c != 0.0 => Some(*value),
                                    _ => v,
                                })
                                .collect();
                            (n, p)
                        })
                        .collect(),
                })
            }
            ImageExpr::Unmask { input, value } => {
                Ok(self.image(input)?.map(|v| v.or(Some(*value))))
            }
            ImageExpr::Classify {
                input,
                thresholds,
                nodata,
                name,
            } => {
                let raster = self.image(input)?;
                let (_, pixels) = raster
                    .bands
                    .into_iter()
                    .next()
                    .ok_or_else(|| "classify of empty image".to_string())?;
                let classes = pixels
                    .into_iter()
                    .map(|v| {
                        v.map(|v| {
                            if v <= *nodata {
                                0.0
                            } else {
                                thresholds.classify(v) as f64
                            }
                        })
                    })
                    .collect();
                Ok(Raster {
                    bands: vec![(name.clone(), classes)],
                })
            }
            ImageExpr::Clip { input, geometry } => {
                let raster = self.image(input)?;
                let inside = self.region_mask(geometry);
                Ok(Raster {
                    bands: raster
                        .bands
                        .into_iter()
                        .map(|(n, p)| {
                            let p = p
                                .into_iter()
                                .zip(&inside)
                                .map(|(v, keep)| if *keep { v } else { None })
                                .collect();
                            (n, p)
                        })
                        .collect(),
                })
            }
            ImageExpr::Cast { input, pixel_type } => {
                let raster = self.image(input)?;
                Ok(match pixel_type {
                    PixelType::Float32 => raster,
                    PixelType::Int32 => raster.map(|v| v.map(f64::trunc)),
                })
            }
            ImageExpr::Visualize { input, vis } => {
                let raster = self.image(input)?;
                let (_, pixels) = raster
                    .bands
                    .into_iter()
                    .next()
                    .ok_or_else(|| "visualize of empty image".to_string())?;
                let mut rgb: [Pixels; 3] = [Vec::new(), Vec::new(), Vec::new()];
                for v in pixels {
                    let color = match v {
                        Some(v) => Some(vis.color_for(v).map_err(|e| e.to_string())?),
                        None => None,
                    };
                    rgb[0].push(color.map(|c| c.r as f64));
                    rgb[1].push(color.map(|c| c.g as f64));
                    rgb[2].push(color.map(|c| c.b as f64));
                }
                Ok(Raster {
                    bands: VIS_BANDS
                        .iter()
                        .map(|b| b.to_string())
                        .zip(rgb)
                        .collect(),
                })
            }
        }
    }

    /// Reduce an image over the pixels of a geometry.
    pub fn reduce_region(&self, reduction: &RegionReduction) -> EvalResult<ReducedValues> {
        let raster = self.image(&reduction.image)?;
        let pixels: Vec<usize> = self
            .region_mask(&reduction.geometry)
            .into_iter()
            .enumerate()
            .filter_map(|(i, inside)| inside.then_some(i))
            .collect();

        let mut out = ReducedValues::new();
        for (key, band, reducer) in reduction.output_keys() {
            let values = raster.require(&band)?;
            let valid: Vec<f64> = pixels.iter().filter_map(|i| values[*i]).collect();
            let value = match reducer {
                RegionReducer::Min => valid.iter().copied().reduce(f64::min),
                RegionReducer::Max => valid.iter().copied().reduce(f64::max),
                RegionReducer::Mean => mean(&valid),
                RegionReducer::First => valid.first().copied(),
            };
            out.insert(key, value);
        }
        Ok(out)
    }

    /// Which pixels a geometry covers. Admin boundaries cover everything.
    fn region_mask(&self, geometry: &Geometry) -> Vec<bool> {
        let len = self.spec.len();
        match geometry {
            Geometry::Admin { .. } => vec![true; len],
            Geometry::Rectangle(bbox) => (0..len)
                .map(|i| {
                    let (lon, lat) = self.spec.center(i);
                    bbox.contains_point(lon, lat)
                })
                .collect(),
            Geometry::Point(c) => {
                let hit = self.spec.index_at(c.lon, c.lat);
                (0..len).map(|i| Some(i) == hit).collect()
            }
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn reduce_values(reducer: CollectionReducer, mut values: Vec<f64>) -> Option<f64> {
    match reducer {
        CollectionReducer::Mean => mean(&values),
        CollectionReducer::Count => Some(values.len() as f64),
        CollectionReducer::Sum => {
            if values.is_empty() {
                None
            } else {
                Some(values.iter().sum())
            }
        }
        CollectionReducer::Median => {
            if values.is_empty() {
                return None;
            }
            values.sort_by(f64::total_cmp);
            let mid = values.len() / 2;
            if values.len() % 2 == 1 {
                Some(values[mid])
            } else {
                Some((values[mid - 1] + values[mid]) / 2.0)
            }
        }
    }
}

fn binary_images(op: BinaryOp, left: Raster, right: &Raster) -> EvalResult<Raster> {
    let broadcast = right.bands.len() == 1;
    if !broadcast && right.bands.len() != left.bands.len() {
        return Err(format!(
            "band count mismatch: {} vs {}",
            left.bands.len(),
            right.bands.len()
        ));
    }
    Ok(Raster {
        bands: left
            .bands
            .into_iter()
            .enumerate()
            .map(|(bi, (n, p))| {
                let rhs = &right.bands[if broadcast { 0 } else { bi }].1;
                let p = p
                    .into_iter()
                    .zip(rhs)
                    .map(|(a, b)| match (a, b) {
                        (Some(a), Some(b)) => op.apply(a, *b),
                        _ => None,
                    })
                    .collect();
                (n, p)
            })
            .collect(),
    })
}

fn apply_scene_op(mut scene: Scene, op: &SceneOp) -> EvalResult<Scene> {
    match op {
        SceneOp::UpdateMask { rules, .. } => {
            let len = scene.bands.first().map(|(_, p)| p.len()).unwrap_or(0);
            let mut keep = vec![true; len];
            for rule in rules {
                let quality = scene
                    .get(rule.band())
                    .ok_or_else(|| format!("quality band '{}' missing", rule.band()))?;
                for (i, q) in quality.iter().enumerate() {
                    if let Some(q) = q {
                        keep[i] &= rule.keeps(*q);
                    }
                }
            }
            for (_, pixels) in scene.bands.iter_mut() {
                for (v, k) in pixels.iter_mut().zip(&keep) {
                    if !k {
                        *v = None;
                    }
                }
            }
            Ok(scene)
        }
        SceneOp::NormalizedDifference { a, b, name } => {
            let a = scene.get(a).ok_or_else(|| format!("band '{}' missing", a))?;
            let b = scene.get(b).ok_or_else(|| format!("band '{}' missing", b))?;
            let nd: Pixels = a
                .iter()
                .zip(b)
                .map(|(a, b)| match (a, b) {
                    (Some(a), Some(b)) if a + b != 0.0 => Some((a - b) / (a + b)),
                    _ => None,
                })
                .collect();
            Ok(scene.band(name, nd))
        }
        SceneOp::Threshold { band, above, name } => {
            let values = scene
                .get(band)
                .ok_or_else(|| format!("band '{}' missing", band))?;
            let binary = values
                .iter()
                .map(|v| v.map(|v| if v > *above { 1.0 } else { 0.0 }))
                .collect();
            scene.bands = vec![(name.clone(), binary)];
            Ok(scene)
        }
        SceneOp::Select { bands } => {
            let mut selected = Vec::new();
            for band in bands {
                let values = scene
                    .get(band)
                    .ok_or_else(|| format!("band '{}' missing", band))?;
                selected.push((band.clone(), values.clone()));
            }
            scene.bands = selected;
            Ok(scene)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::grid::FARIDPUR_2X2;
    use raster_expr::Image;
    use verdant_common::{Thresholds, NODATA};

    fn eval(expr: &ImageExpr) -> Raster {
        let catalog = HashMap::new();
        Evaluator::new(&FARIDPUR_2X2, &catalog).image(expr).unwrap()
    }

    #[test]
    fn test_where_and_classify() {
        let img = Image::constant(0.7, "v")
            .replace_where(&Image::constant(1.0, "c"), NODATA)
            .unwrap()
            .classify(Thresholds::new(0.2, 0.5), NODATA, "class")
            .unwrap();
        let raster = eval(img.expr());
        assert_eq!(raster.value("class", 0), Some(0.0));
    }

    #[test]
    fn test_divide_by_zero_masks() {
        let img = Image::constant(1.0, "a")
            .divide_by(&Image::constant(0.0, "b"))
            .unwrap();
        assert_eq!(eval(img.expr()).value("a", 0), None);
    }

    #[test]
    fn test_median_even_count() {
        assert_eq!(
            reduce_values(CollectionReducer::Median, vec![4.0, 1.0, 3.0, 2.0]),
            Some(2.5)
        );
        assert_eq!(reduce_values(CollectionReducer::Count, vec![]), Some(0.0));
        assert_eq!(reduce_values(CollectionReducer::Sum, vec![]), None);
    }
}

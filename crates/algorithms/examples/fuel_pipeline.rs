//! End-to-end run over a synthetic scene: import bands, derive terrain and
//! vegetation products, and classify fuel models.
//!
//! Run with: `cargo run -p rasterforge-algorithms --example fuel_pipeline`

use ndarray::Array2;
use rasterforge_algorithms::prelude::*;

fn main() -> Result<()> {
    let size = 64;
    // Bands: red, nir, elevation, water mask
    let red = Array2::from_shape_fn((size, size), |(r, _)| 0.05 + r as f64 * 0.002);
    let nir = Array2::from_shape_fn((size, size), |(_, c)| 0.2 + c as f64 * 0.008);
    let dem = Array2::from_shape_fn((size, size), |(r, c)| {
        let dx = c as f64 - 32.0;
        let dy = r as f64 - 32.0;
        (400.0 - (dx * dx + dy * dy)).max(0.0) / 20.0
    });
    let water = Array2::from_shape_fn((size, size), |(r, c)| f64::from(r > 56 && c < 10));

    let source = MemorySource::try_new(vec![red, nir, dem, water])?
        .with_transform(GeoTransform::north_up(440_000.0, 4_500_000.0, 30.0, -30.0))
        .with_projection("EPSG:32630");

    let config = ImportConfig::from_json_str(
        r#"{
            "scale": 64,
            "bands": [
                {"id": 1, "name": "red", "type": "absolute"},
                {"id": 2, "name": "nir", "type": "absolute"},
                {"id": 3, "name": "elevation", "type": "absolute"},
                {"id": 4, "name": "water", "type": "absolute"}
            ]
        }"#,
    )?;
    let mut scene = Raster::new(config.scale);
    scene.import_layers(&source, &config.bands)?;

    let ndvi = composite_layers(&scene, &Preset::Ndvi.formula()?, None, CompositeParams::default())?;

    let elevation = scene.stack_layers(&["elevation"])?;
    let slope_deg = slope(&elevation, None, SlopeParams::default())?;

    let water = scene.stack_layers(&["water"])?;
    let shore = distance(
        &water,
        None,
        DistanceParams {
            mask_size: MaskSize::Precise,
            ..Default::default()
        },
    )?;

    // Treat elevation as a canopy-height proxy for the demo
    let ndvi = ndvi.into_raster()?;
    let shore = shore.into_raster()?;
    let layers = FuelLayers {
        water: Some((&water).into()),
        distance: Some((&shore).into()),
        ..FuelLayers::new(&ndvi, &elevation)
    };
    let fuel = fuel_map(
        &layers,
        &FuelParams {
            min_distance: 2.0,
            ..Default::default()
        },
    )?;

    let max_slope = slope_deg
        .data()
        .map(|d| d.iter().cloned().fold(0.0, f64::max))
        .unwrap_or_default();
    println!("layers: {:?}", scene.layer_names());
    println!("max slope: {max_slope:.1} deg");
    if let Some(map) = fuel.data() {
        for code in [0.0, 5.0, 8.0, 10.0] {
            let count = map.iter().filter(|&&v| v == code).count();
            println!("fuel model {code}: {count} pixels");
        }
    }
    Ok(())
}

use ozimap::{Crs, MapCalibration, Result};

fn main() -> Result<()> {
    println!("ozimap - OziExplorer Map Calibration Info\n");

    let path = std::env::args().nth(1).unwrap_or_else(|| "demo.map".to_string());

    let cal = MapCalibration::from_file(&path)?;

    println!("Title:  {}", cal.title);
    println!("Raster: {}", cal.raster_path.display());

    match &cal.crs {
        Crs::Geographic(geo) => {
            println!("CRS:    geographic");
            println!("  Datum:     {}", geo.datum.name);
            println!("  Ellipsoid: {}", geo.datum.ellipsoid.name);
            if let Some(shift) = geo.datum.shift {
                println!("  To WGS84:  ({}, {}, {})", shift.dx, shift.dy, shift.dz);
            }
        }
        Crs::Projected { base, method, params } => {
            println!("CRS:    projected via {}", method.name());
            println!("  Datum:     {}", base.datum.name);
            println!("  Ellipsoid: {}", base.datum.ellipsoid.name);
            if let Some(shift) = base.datum.shift {
                println!("  To WGS84:  ({}, {}, {})", shift.dx, shift.dy, shift.dz);
            }
            for p in params {
                println!("  {:<22} {}", p.name, p.value);
            }
        }
    }

    let [a, b, c, d, e, f] = cal.transform.coefficients();
    println!("\nGeotransform:");
    println!("  x = {} + {} * col + {} * row", a, b, c);
    println!("  y = {} + {} * col + {} * row", d, e, f);

    println!("\nControl points: {}", cal.control_points.len());
    for cp in &cal.control_points {
        let (x, y) = cal.transform.apply(f64::from(cp.col), f64::from(cp.row));
        println!(
            "  pixel ({:>6}, {:>6}) -> world ({:.6}, {:.6})  residual ({:+.2e}, {:+.2e})",
            cp.col,
            cp.row,
            cp.x,
            cp.y,
            x - cp.x,
            y - cp.y
        );
    }

    if let Some((min_x, min_y, max_x, max_y)) = cal.bounding_box() {
        println!("\nBounding Box:");
        println!("  Min: ({}, {})", min_x, min_y);
        println!("  Max: ({}, {})", max_x, max_y);
        println!("  Extent: {} x {}", max_x - min_x, max_y - min_y);
    }

    Ok(())
}

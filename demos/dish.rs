//! Drop a few blobs on a disk, pick some colors and save the frame as
//! `dish.png`.

use std::{env, error::Error};
use blob_palette::{PaletteSpace, Point, RGBColor, SpreadPolicy};

type Err = Box<dyn Error>;

fn main() -> Result<(), Err> {
    let seed = env::args().nth(1).and_then(|s| s.parse().ok()).unwrap_or(1);
    let mut space = PaletteSpace::builder(640, 480).pixel_ratio(1.)
        .policy(SpreadPolicy::seeded(seed))
        .build();
    for &(x, y) in &[(320., 240.), (260., 200.), (380., 210.),
                     (300., 300.), (360., 290.)] {
        if space.add_blob(Point::new(x, y)).is_none() {
            eprintln!("blob at ({x}, {y}) rejected");
        }
    }
    // Drag one blob far away: it stops on the border of the disk.
    if let Some(p) = space.move_blob(4, Point::new(600., 450.)) {
        println!("blob 4 moved to ({:.1}, {:.1})", p.x, p.y);
    }

    for x in (200 ..= 440).step_by(40) {
        match space.use_color(Point::new(x as f64, 240.)) {
            Some(c) => println!("{x:3}: {} (hue {:5.1}°)", c.to_hex(), c.hue()),
            None => println!("{x:3}: no color"),
        }
    }
    println!("{} snapshot(s), {} color(s) on the wheel",
             space.history().len(), space.wheel().len());
    for s in space.wheel().sectors() {
        println!("  {} from {:6.3} to {:6.3} rad",
                 s.color.to_hex(), s.start_angle, s.end_angle);
    }

    let frame = space.render();
    // Uncovered pixels are transparent in the frame; display them.
    let bytes: Vec<u8> = frame.pixels().iter()
        .flat_map(|p| [p.r, p.g, p.b, 255])
        .collect();
    let img = image::RgbaImage::from_raw(frame.width(), frame.height(), bytes)
        .ok_or("frame size mismatch")?;
    img.save("dish.png")?;
    Ok(())
}

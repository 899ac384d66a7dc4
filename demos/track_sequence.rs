use boxtrack::{Bbox, TrackedBox, Tracker, TrackerConfig};

fn print_tracks(label: &str, tracks: &[TrackedBox]) {
    println!("{}: {} tracks reported", label, tracks.len());
    for track in tracks {
        println!(
            "  Track ID {}: [{:.1}, {:.1}, {:.1}, {:.1}]",
            track.id, track.bbox.xmin, track.bbox.ymin, track.bbox.xmax, track.bbox.ymax
        );
    }
}

fn main() -> anyhow::Result<()> {
    println!("Tracking a short detection sequence...");

    let mut tracker = Tracker::new(TrackerConfig::default());

    // Frame 1: three objects enter the scene
    let detections1 = vec![
        Bbox::new(10.0, 10.0, 50.0, 50.0),
        Bbox::new(100.0, 100.0, 150.0, 150.0),
        Bbox::new(200.0, 200.0, 240.0, 240.0),
    ];
    let tracks = tracker.update(&detections1)?;
    print_tracks("Frame 1", &tracks);

    // Frame 2: all three move slightly, identities must hold
    let detections2 = vec![
        Bbox::new(12.0, 12.0, 52.0, 52.0),
        Bbox::new(102.0, 98.0, 152.0, 148.0),
        Bbox::new(205.0, 195.0, 245.0, 235.0),
    ];
    let tracks = tracker.update(&detections2)?;
    print_tracks("\nFrame 2", &tracks);

    // Frame 3: the second object is occluded; its track coasts silently
    let detections3 = vec![
        Bbox::new(14.0, 14.0, 54.0, 54.0),
        Bbox::new(210.0, 190.0, 250.0, 230.0),
    ];
    let tracks = tracker.update(&detections3)?;
    print_tracks("\nFrame 3 (one object occluded)", &tracks);
    println!("  Live tracks including coasting: {}", tracker.num_tracks());

    // Frame 4: the occluded object reappears near its prediction and a
    // brand new object enters
    let detections4 = vec![
        Bbox::new(16.0, 16.0, 56.0, 56.0),
        Bbox::new(104.0, 96.0, 154.0, 146.0),
        Bbox::new(300.0, 300.0, 340.0, 340.0),
    ];
    let tracks = tracker.update(&detections4)?;
    print_tracks("\nFrame 4 (reappearance plus a new object)", &tracks);

    // Frames 5-10: everything leaves the scene; watch tracks age out
    for frame in 5..=10 {
        let tracks = tracker.update(&[])?;
        println!(
            "\nFrame {}: {} reported, {} still alive",
            frame,
            tracks.len(),
            tracker.num_tracks()
        );
    }

    println!("\nFinal live tracks: {}", tracker.num_tracks());

    Ok(())
}

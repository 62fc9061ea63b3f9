use std::sync::Arc;

use list_window::{HeightAnomaly, ListOptions, VirtualList};

fn main() -> list_window::Result<()> {
    // Chat-like rows: most are one line, every seventh wraps to three.
    let heights: Arc<Vec<f64>> = Arc::new(
        (0..100_000)
            .map(|i| if i % 7 == 0 { 54.0 } else { 18.0 })
            .collect(),
    );

    let table = Arc::clone(&heights);
    let mut list = VirtualList::new(
        ListOptions::variable(heights.len(), move |i| table[i], 240.0)
            .with_overscan(2)
            .with_on_height_anomaly(Some(|a: HeightAnomaly| {
                eprintln!("bad height {} at {}, using {}", a.value, a.index, a.fallback)
            })),
    )?;

    // Simulate a fling: one scroll event per 16ms frame.
    let mut now_ms = 0u64;
    for frame in 0..120u32 {
        now_ms += 16;
        list.on_scroll(f64::from(frame) * 90.0, now_ms);
        list.tick(now_ms);
    }
    println!(
        "offset={} range={:?} heights evaluated={} of {}",
        list.scroll_offset(),
        list.virtual_range(),
        list.metrics().height_evaluations(),
        list.count()
    );

    list.for_each_item(|item| {
        println!("  #{:<6} y={:<8} h={}", item.index, item.offset, item.height);
    });

    // The fling settles once the quiet period passes without new events.
    let settled_at = list.quiet_deadline().unwrap_or(now_ms);
    list.tick(settled_at);
    println!("is_scrolling={}", list.is_scrolling());
    Ok(())
}

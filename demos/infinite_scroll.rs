use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use list_window::{ListOptions, VirtualList};

const PAGE: usize = 50;

fn main() -> list_window::Result<()> {
    let wants_page = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&wants_page);

    // Rows are measured after layout; until then they count as 32px.
    let mut list = VirtualList::new(
        ListOptions::measured(PAGE, 32.0, 400.0)
            .with_end_reached_threshold(0.9)
            .with_on_end_reached(Some(move || flag.store(true, Ordering::SeqCst))),
    )?;

    let mut now_ms = 0u64;
    let mut offset = 0.0;
    while list.count() < PAGE * 5 {
        now_ms += 16;
        offset += 64.0;
        list.on_scroll(offset, now_ms);

        // Measure what the host just laid out.
        let mut rendered = Vec::new();
        list.collect_items(&mut rendered);
        list.measure_many(rendered.iter().map(|it| (it.index, 30.0 + (it.index % 3) as f64)));

        // A single page is in flight at a time.
        if wants_page.swap(false, Ordering::SeqCst) {
            println!("loading page at offset={offset} count={}", list.count());
            list.set_count(list.count() + PAGE);
        }
        list.tick(now_ms);
    }

    println!(
        "loaded {} rows, total_height={} ratio={:.2}",
        list.count(),
        list.total_height(),
        list.end_reached_ratio()
    );
    Ok(())
}

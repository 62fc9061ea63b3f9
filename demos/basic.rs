use list_window::{Align, ListOptions, VirtualList};

fn main() -> list_window::Result<()> {
    let mut list = VirtualList::new(
        ListOptions::uniform(1_000_000, 1.0, 10.0)
            .with_on_scroll_request(Some(|offset: f64| println!("host: scroll to {offset}"))),
    )?;
    list.on_scroll(123_456.0, 0);

    let mut items = Vec::new();
    list.collect_items(&mut items);
    println!("total_height={}", list.total_height());
    println!("virtual_range={:?}", list.virtual_range());
    println!("first_item={:?}", items.first());

    let requested = list.scroll_to_index_aligned(999_999, Align::End);
    list.on_scroll(requested, 16);
    println!(
        "after scroll_to_index: offset={} visible_range={:?}",
        list.scroll_offset(),
        list.visible_range()
    );
    Ok(())
}

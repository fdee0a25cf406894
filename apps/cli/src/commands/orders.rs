//! `checkout` and `orders`.

use comfy_client::StoreResult;
use comfy_core::pagination::build_page_url;

use crate::console;
use crate::Shop;

pub async fn checkout(shop: &mut Shop, name: &str, address: &str) -> StoreResult<()> {
    let info = shop.checkout(name, address).await?;
    println!(
        "{} items, {} charged to {}",
        info.num_items_in_cart, info.order_total, info.name
    );
    Ok(())
}

pub async fn list(shop: &Shop, page: Option<u32>) -> StoreResult<()> {
    let search = match page {
        Some(page) => build_page_url(page, "", ""),
        None => String::new(),
    };
    let history = shop.orders(&search).await?;

    println!("Total orders: {}", history.meta.total);
    for order in &history.orders {
        println!("{}", console::order_line(order));
    }

    if let Some(controls) = &history.pagination {
        print!("{}", console::pagination(controls));
    }
    Ok(())
}

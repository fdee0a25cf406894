//! `featured`, `products` and `product`.

use comfy_client::StoreResult;
use comfy_core::ProductQuery;

use crate::console;
use crate::Shop;

pub async fn featured(shop: &Shop) -> StoreResult<()> {
    for product in shop.featured_products().await? {
        println!("{}", console::product_line(&product));
    }
    Ok(())
}

pub async fn products(shop: &Shop, query: &ProductQuery) -> StoreResult<()> {
    let search = format!("?{}", query.to_query_string());
    let listing = shop.products(&search).await?;

    println!("{}", listing.caption);
    if listing.is_empty() {
        println!("Sorry, no products matched your search...");
        return Ok(());
    }

    for product in &listing.products {
        println!("{}", console::product_line(product));
    }

    if let Some(controls) = &listing.pagination {
        print!("{}", console::pagination(controls));
    }
    Ok(())
}

pub async fn product(shop: &Shop, id: u64) -> StoreResult<()> {
    let product = shop.product(id).await?;
    print!("{}", console::product_detail(&product));
    Ok(())
}

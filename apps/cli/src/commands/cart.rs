//! `cart show|add|remove|edit|clear`.

use comfy_client::StoreResult;

use crate::console;
use crate::Shop;

pub fn show(shop: &Shop) -> StoreResult<()> {
    print!("{}", console::cart(shop.cart()));
    Ok(())
}

pub async fn add(shop: &mut Shop, product_id: u64, color: Option<&str>, amount: u32) -> StoreResult<()> {
    shop.add_product_to_cart(product_id, color, amount).await?;
    show(shop)
}

pub async fn remove(shop: &mut Shop, cart_id: &str) -> StoreResult<()> {
    if !shop.remove_from_cart(cart_id).await?.is_change() {
        eprintln!("No cart line '{}'", cart_id);
    }
    show(shop)
}

pub async fn edit(shop: &mut Shop, cart_id: &str, amount: u32) -> StoreResult<()> {
    if shop.cart().find(cart_id).is_none() {
        eprintln!("No cart line '{}'", cart_id);
    }
    shop.edit_cart_item(cart_id, amount).await?;
    show(shop)
}

pub async fn clear(shop: &mut Shop) -> StoreResult<()> {
    shop.clear_cart().await?;
    show(shop)
}

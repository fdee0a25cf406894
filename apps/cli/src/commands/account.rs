//! `login`, `logout`, `register`, `theme` and `links`.

use comfy_client::StoreResult;
use comfy_core::Theme;

use crate::console;
use crate::Shop;

pub async fn login(shop: &mut Shop, identifier: &str, password: &str) -> StoreResult<()> {
    let user = shop.login(identifier, password).await?;
    println!("Hello, {}", user.username);
    Ok(())
}

pub async fn logout(shop: &mut Shop) -> StoreResult<()> {
    shop.logout().await
}

pub async fn register(shop: &mut Shop, username: &str, email: &str, password: &str) -> StoreResult<()> {
    shop.register(username, email, password).await?;
    println!("Next: comfy login {} <password>", username.trim());
    Ok(())
}

pub async fn theme(shop: &mut Shop, value: Option<Theme>) -> StoreResult<()> {
    if let Some(theme) = value {
        shop.set_theme(theme).await?;
    }
    let colorfgbg = std::env::var("COLORFGBG").ok();
    let prefers_dark = console::terminal_prefers_dark(colorfgbg.as_deref());
    println!("{}", console::theme_line(shop.theme(), prefers_dark));
    Ok(())
}

pub fn links(shop: &Shop) {
    for link in shop.nav_links() {
        println!("{:<10} {}", link.label, link.href);
    }
}

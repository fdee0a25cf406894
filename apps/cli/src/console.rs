//! Terminal output: notices and text renderings of storefront data.

use comfy_client::{NoticeLevel, Notifier};
use comfy_core::pagination::{PageEntry, PaginationControls};
use comfy_core::{CartItem, CartState, Order, Product, Theme};

/// Prints notices: successes to stdout, errors to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        tracing::debug!(notice = %message, ?level, "notice");
        match level {
            NoticeLevel::Success => println!("{}", message),
            NoticeLevel::Error => eprintln!("{}", message),
        }
    }
}

/// `#3  coffee table  modenza  $179.99`
pub fn product_line(product: &Product) -> String {
    let attrs = &product.attributes;
    format!(
        "#{:<4} {}  {}  {}",
        product.id, attrs.title, attrs.company, attrs.price
    )
}

/// Multi-line product detail.
pub fn product_detail(product: &Product) -> String {
    let attrs = &product.attributes;
    let mut out = format!(
        "{}\n{}\n{}\n",
        attrs.title, attrs.company, attrs.price
    );
    if !attrs.description.is_empty() {
        out.push_str(&attrs.description);
        out.push('\n');
    }
    if !attrs.colors.is_empty() {
        out.push_str(&format!("colors: {}\n", attrs.colors.join(", ")));
    }
    if attrs.shipping {
        out.push_str("free shipping\n");
    }
    out
}

fn cart_line(item: &CartItem) -> String {
    format!(
        "{:<16} {} ({})  {} x {}  = {}",
        item.cart_id,
        item.title,
        item.product_color,
        item.amount,
        item.price,
        item.line_total()
    )
}

/// Cart lines followed by the totals block.
pub fn cart(cart: &CartState) -> String {
    if cart.is_empty() {
        return "Your cart is empty\n".to_string();
    }

    let mut out = String::new();
    for item in &cart.cart_items {
        out.push_str(&cart_line(item));
        out.push('\n');
    }
    out.push_str(&format!("Items        {}\n", cart.num_items_in_cart));
    out.push_str(&format!("Subtotal     {}\n", cart.cart_total));
    out.push_str(&format!("Shipping     {}\n", cart.shipping));
    out.push_str(&format!("Tax          {}\n", cart.tax));
    out.push_str(&format!("Order Total  {}\n", cart.order_total));
    out
}

/// `#11  2024-01-02  Anna, 1 Main St  2 items  $27.00`
pub fn order_line(order: &Order) -> String {
    let attrs = &order.attributes;
    format!(
        "#{:<4} {}  {}, {}  {} items  {}",
        order.id,
        attrs.created_at.format("%Y-%m-%d"),
        attrs.name,
        attrs.address,
        attrs.num_items_in_cart,
        attrs.order_total
    )
}

/// `prev: ...` / `[1] ... [5*] ... [9]` / `next: ...`
pub fn pagination(controls: &PaginationControls) -> String {
    let pages: Vec<String> = controls
        .entries
        .iter()
        .map(|entry| match entry {
            PageEntry::Page { number, active: true, .. } => format!("[{}*]", number),
            PageEntry::Page { number, .. } => format!("[{}]", number),
            PageEntry::Ellipsis => "...".to_string(),
        })
        .collect();

    format!(
        "prev: {}\n{}\nnext: {}\n",
        controls.prev_url,
        pages.join(" "),
        controls.next_url
    )
}

/// Guesses the terminal background from `COLORFGBG` (`"fg;bg"`).
///
/// Backgrounds 0-6 and 8 are the dark ANSI colours. Unknown means light.
pub fn terminal_prefers_dark(colorfgbg: Option<&str>) -> bool {
    colorfgbg
        .and_then(|v| v.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok())
        .map(|bg| bg <= 6 || bg == 8)
        .unwrap_or(false)
}

/// `theme: system (dark)`
pub fn theme_line(theme: Theme, prefers_dark: bool) -> String {
    format!("theme: {} ({})", theme, theme.resolve(prefers_dark).as_str())
}

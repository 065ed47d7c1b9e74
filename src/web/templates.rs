// Askama template definitions

use askama::Template;

// Store index / home page
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub title: &'static str,
}

// Login form, also rendered in place of gated pages
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub title: &'static str,
}

// Account page
#[derive(Template)]
#[template(path = "account.html")]
pub struct AccountTemplate {
    pub title: &'static str,
    pub user: String,
    pub alert: Option<String>,
}

// Product detail / ordering page
#[derive(Template)]
#[template(path = "buy.html")]
pub struct BuyTemplate {
    pub title: &'static str,
    pub item: String,
    pub price: String,
    pub category: String,
    pub desc: String,
}

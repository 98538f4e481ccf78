// handlers/public/mod.rs - Public handlers (no authentication)
//
// Landing info, health, the home feed, and the published directory, projects and news.

pub mod home;
pub mod listing;
pub mod news;
pub mod people;
pub mod projects;

pub use home::{health, home_feed, root};
pub use listing::ListPage;
pub use news::{news_list, news_show};
pub use people::{people_list, people_show};
pub use projects::{projects_list, projects_show};

pub mod bracket;
pub mod config;
pub mod countdown;
pub mod dates;
pub mod demo_source;
pub mod error;
pub mod gallery;
pub mod gviz;
pub mod http_client;
pub mod leaderboard;
pub mod provider;
pub mod roster;
pub mod schedule;
pub mod section;
pub mod sheet_client;
pub mod sheet_source;
pub mod sports_info;
pub mod state;
pub mod table;
pub mod text_dump;

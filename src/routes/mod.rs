// 路由处理器，按资源划分

pub mod advice;
pub mod asset;
pub mod currency;
pub mod health;
pub mod insight;
pub mod password;
pub mod record;
pub mod settings;

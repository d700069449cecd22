pub(crate) mod health;
pub(crate) mod metadata;
pub(crate) mod prices;
pub(crate) mod upload;

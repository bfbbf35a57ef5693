pub(crate) mod deep_link;
pub(crate) mod routes;
pub(crate) mod scroll_router;

//! Marketplace workflows. Catalog CRUD lives in the document-store-backed
//! admin surface outside this service; only the reservation admission engine
//! runs here.

pub mod reservations;

pub mod impl_knn;
pub mod interface;

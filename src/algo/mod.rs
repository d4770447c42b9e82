pub mod aggregate;
pub mod engagement;
pub mod hierarchy;
pub mod keywords;
pub mod kmeans;
pub mod lexicon;
pub mod normalize;

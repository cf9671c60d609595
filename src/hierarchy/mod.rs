mod load;
mod model;

pub use load::{DatasetSource, load_dataset};
pub use model::{Dataset, HierarchyNode, NodeId};

pub mod memory_graph;
pub mod memory_list;

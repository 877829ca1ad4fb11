pub mod test_pruning;

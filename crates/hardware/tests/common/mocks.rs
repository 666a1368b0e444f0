//! Mock implementations of the memory-dependence predictor seam.

use mockall::mock;
use o3sim_core::core::pipeline::mem_dep::DepPredictor;
use o3sim_core::core::DynInstRef;

mock! {
    pub Predictor {}
    impl DepPredictor for Predictor {
        fn check_dependency(&mut self, load: &DynInstRef) -> bool;
        fn train_violation(&mut self, store: &DynInstRef, load: &DynInstRef);
    }
}

//! Memory Instruction Tests — ordering gates, replay, violations.

use crate::common::builders::InstBuilder;
use crate::common::harness::IqBench;
use crate::common::mocks::MockPredictor;
use o3sim_core::common::types::OpClass;

#[test]
fn load_issues_once_register_and_memory_ready() {
    let mut bench = IqBench::with_defaults();
    let load = InstBuilder::new(1).op(OpClass::MemRead).dests(&[4]).build();
    bench.iq.insert(load.clone());

    bench.tick();
    assert!(load.is_issued());
    // MemRead is 2 cycles: the bundle carries it at cycle 2.
    assert!(bench.tick().is_empty());
    let bundle = bench.tick();
    assert_eq!(IqBench::seqs(&bundle), vec![1]);
}

#[test]
fn barrier_holds_younger_load_until_it_completes() {
    let mut bench = IqBench::with_defaults();
    let barrier = InstBuilder::new(1).barrier().build();
    let load = InstBuilder::new(2).op(OpClass::MemRead).dests(&[4]).build();
    bench.iq.insert_barrier(barrier.clone());
    bench.iq.insert(load.clone());

    let bundles = bench.tick_n(3);
    assert!(bundles.iter().all(|b| b.is_empty()));
    assert!(!load.is_issued(), "load is ordered behind the barrier");

    bench.send_release(0, 1);
    bench.tick();
    assert!(barrier.is_issued());
    let bundle = bench.tick();
    assert_eq!(IqBench::seqs(&bundle), vec![1]);
    bench.iq.complete_mem_inst(&barrier);

    bench.tick();
    assert!(load.is_issued(), "barrier completion releases the load");
}

#[test]
fn reschedule_then_replay_reissues_the_load() {
    let mut bench = IqBench::with_defaults();
    let load = InstBuilder::new(1).op(OpClass::MemRead).dests(&[4]).build();
    bench.iq.insert(load.clone());

    bench.tick_n(2);
    let bundle = bench.tick();
    assert_eq!(IqBench::seqs(&bundle), vec![1]);

    // The access was deferred (e.g. blocked cache): pull it back, replay.
    bench.iq.reschedule_mem_inst(&load);
    bench.iq.reschedule_mem_inst(&load); // idempotent
    assert!(!load.is_issued());

    bench.iq.replay_mem_inst(&load);
    bench.tick();
    assert!(load.is_issued(), "replayed load selected again");
    assert_eq!(bench.iq.stats.insts_issued, 2, "issued once per attempt");

    bench.tick_n(2);
    bench.iq.complete_mem_inst(&load);
}

#[test]
fn predicted_dependent_load_waits_for_older_store() {
    let mut bench = IqBench::with_defaults();
    let mut predictor = MockPredictor::new();
    predictor.expect_check_dependency().returning(|_| true);
    predictor.expect_train_violation().never();
    bench.iq.set_dep_predictor(0, Box::new(predictor));

    let store = InstBuilder::new(1).op(OpClass::MemWrite).build();
    let load = InstBuilder::new(2).op(OpClass::MemRead).dests(&[4]).build();
    bench.iq.insert(store.clone());
    bench.iq.insert(load.clone());

    bench.tick();
    assert!(store.is_issued());
    assert!(!load.is_issued(), "predictor defers the load");

    let bundle = bench.tick();
    assert_eq!(IqBench::seqs(&bundle), vec![1]);
    bench.iq.complete_mem_inst(&store);

    bench.tick();
    assert!(load.is_issued(), "store completion frees the load");
}

#[test]
fn violation_trains_predictor_and_leaves_state_alone() {
    let mut bench = IqBench::with_defaults();
    let mut predictor = MockPredictor::new();
    predictor
        .expect_train_violation()
        .withf(|store, load| store.seq_num == 48 && load.seq_num == 50)
        .times(1)
        .return_const(());
    bench.iq.set_dep_predictor(0, Box::new(predictor));

    let free_before = bench.iq.num_free_entries();
    let store = InstBuilder::new(48).op(OpClass::MemWrite).build();
    let load = InstBuilder::new(50).op(OpClass::MemRead).pc(0x400).dests(&[4]).build();

    bench.iq.violation(&store, &load);

    // Reporting alone changes nothing in the queue; commit drives recovery.
    assert_eq!(bench.iq.num_free_entries(), free_before);
    assert_eq!(bench.iq.count_insts(), 0);
}

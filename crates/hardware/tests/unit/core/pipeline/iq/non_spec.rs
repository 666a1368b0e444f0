//! Non-Speculative Instruction Tests — held until commit releases them.

use crate::common::builders::InstBuilder;
use crate::common::harness::IqBench;

#[test]
fn serializing_op_waits_for_release() {
    let mut bench = IqBench::with_defaults();
    let inst = InstBuilder::new(20).non_spec().dests(&[5]).build();
    bench.iq.insert_non_spec(inst.clone());

    // Ready by every register measure, but never selected.
    let bundles = bench.tick_n(3);
    assert!(bundles.iter().all(|b| b.is_empty()));
    assert!(!inst.is_issued());

    bench.send_release(0, 20);
    let bundle = bench.tick();
    assert_eq!(IqBench::seqs(&bundle), vec![20]);
    assert!(!inst.is_non_spec(), "flag cleared on release");
}

#[test]
fn released_op_wakes_its_consumers() {
    let mut bench = IqBench::with_defaults();
    bench
        .iq
        .insert_non_spec(InstBuilder::new(20).non_spec().dests(&[5]).build());
    bench.iq.insert(InstBuilder::new(21).srcs(&[5]).dests(&[6]).build());

    let bundles = bench.tick_n(2);
    assert!(bundles.iter().all(|b| b.is_empty()), "consumer waits too");

    bench.send_release(0, 20);
    let bundle = bench.tick();
    assert_eq!(IqBench::seqs(&bundle), vec![20, 21], "back-to-back after release");
}

#[test]
fn non_spec_counts_in_stats() {
    let mut bench = IqBench::with_defaults();
    bench
        .iq
        .insert_non_spec(InstBuilder::new(20).non_spec().build());
    assert_eq!(bench.iq.stats.insts_added, 1);
    assert_eq!(bench.iq.stats.non_spec_insts_added, 1);
}

#[test]
#[should_panic(expected = "unknown seq")]
fn release_of_unknown_seq_is_fatal() {
    let mut bench = IqBench::with_defaults();
    bench.send_release(0, 999);
    bench.tick();
}

#[test]
#[should_panic(expected = "unknown seq")]
fn double_release_is_fatal() {
    let mut bench = IqBench::with_defaults();
    bench
        .iq
        .insert_non_spec(InstBuilder::new(20).non_spec().dests(&[5]).build());
    bench.send_release(0, 20);
    bench.tick();
    bench.send_release(0, 20);
    bench.tick();
}

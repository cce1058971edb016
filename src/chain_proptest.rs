#![cfg(test)]

// Property tests for Chain, checked against a VecDeque model.

use crate::chain::{Chain, NodeHandle};
use proptest::prelude::*;
use std::collections::VecDeque;

#[derive(Clone, Debug)]
enum ChainOp {
    PushHead(i32),
    PushTail(i32),
    // Index into the live nodes, taken modulo their count.
    PopNode(usize),
    PopHead,
    PopTail,
    MoveToHead(usize),
    MoveToTail(usize),
}

fn arb_ops() -> impl Strategy<Value = Vec<ChainOp>> {
    let op = prop_oneof![
        any::<i32>().prop_map(ChainOp::PushHead),
        any::<i32>().prop_map(ChainOp::PushTail),
        any::<usize>().prop_map(ChainOp::PopNode),
        Just(ChainOp::PopHead),
        Just(ChainOp::PopTail),
        any::<usize>().prop_map(ChainOp::MoveToHead),
        any::<usize>().prop_map(ChainOp::MoveToTail),
    ];
    proptest::collection::vec(op, 1..80)
}

// Property: after every operation the chain's values (head to tail) equal
// the model's, links are consistent both ways, and handles of popped nodes
// never resolve again.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_chain_matches_deque(ops in arb_ops()) {
        let mut sut: Chain<i32> = Chain::new();
        // Model keeps each value next to the handle the chain gave it.
        let mut model: VecDeque<(i32, NodeHandle)> = VecDeque::new();
        let mut stale: Vec<NodeHandle> = Vec::new();

        for op in ops {
            match op {
                ChainOp::PushHead(v) => {
                    let len = sut.push_to_head(v);
                    model.push_front((v, sut.head().expect("head after push")));
                    prop_assert_eq!(len, model.len());
                }
                ChainOp::PushTail(v) => {
                    let len = sut.push_to_tail(v);
                    model.push_back((v, sut.tail().expect("tail after push")));
                    prop_assert_eq!(len, model.len());
                }
                ChainOp::PopNode(i) => {
                    if !model.is_empty() {
                        let (v, h) = model.remove(i % model.len()).expect("in range");
                        prop_assert_eq!(sut.pop_node(h), Some(v));
                        stale.push(h);
                    }
                }
                ChainOp::PopHead => {
                    let expected = model.pop_front();
                    prop_assert_eq!(sut.pop_from_head(), expected.map(|(v, _)| v));
                    stale.extend(expected.map(|(_, h)| h));
                }
                ChainOp::PopTail => {
                    let expected = model.pop_back();
                    prop_assert_eq!(sut.pop_from_tail(), expected.map(|(v, _)| v));
                    stale.extend(expected.map(|(_, h)| h));
                }
                ChainOp::MoveToHead(i) => {
                    if !model.is_empty() {
                        let item = model.remove(i % model.len()).expect("in range");
                        prop_assert_eq!(sut.move_to_head(item.1), model.len() + 1);
                        model.push_front(item);
                    }
                }
                ChainOp::MoveToTail(i) => {
                    if !model.is_empty() {
                        let item = model.remove(i % model.len()).expect("in range");
                        prop_assert_eq!(sut.move_to_tail(item.1), model.len() + 1);
                        model.push_back(item);
                    }
                }
            }

            sut.assert_links();
            let got: Vec<(i32, NodeHandle)> = sut.iter().map(|(v, h)| (*v, h)).collect();
            let want: Vec<(i32, NodeHandle)> = model.iter().copied().collect();
            prop_assert_eq!(got, want);
            for &h in &stale {
                prop_assert!(sut.get(h).is_none());
            }
        }

        let drained: Vec<i32> = sut.into_iter().collect();
        let want: Vec<i32> = model.iter().map(|(v, _)| *v).collect();
        prop_assert_eq!(drained, want);
    }
}

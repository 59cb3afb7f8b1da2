//! Node wrapper driving an adaptive staircase from a response stream.

use crate::prelude::*;
use crate::staircase::{Staircase, StaircaseConfig};

/// A node that advances a staircase for every received trial response.
///
/// The node receives `bool` correctness judgments and emits the value
/// for the next trial. Once the block ends, responses are consumed but
/// nothing further is emitted.
#[derive(Node)]
#[aggregate]
pub struct StaircaseNode {
    pub input: NodeReceiver<bool>,
    staircase: Staircase,
    pub sender: NodeSender<f64>,
}

impl StaircaseNode {
    pub fn run(&mut self, correct: bool) -> Result<Option<f64>, NodeError> {
        Ok(self.staircase.respond(correct))
    }

    /// Read access to the wrapped track, for pulling the trial history
    /// and end reason after the block is over.
    pub fn staircase(&self) -> &Staircase {
        &self.staircase
    }
}

/// Constructs a new `StaircaseNode` for the given block configuration.
pub fn staircase_node(config: StaircaseConfig) -> StaircaseNode {
    StaircaseNode::new(Staircase::new(config))
}

#[cfg(test)]
mod test {
    use crate::prelude::*;
    use crate::staircase::staircase_node::*;
    use crate::staircase::StaircaseConfig;
    use std::thread;

    #[test]
    // Runs a scripted response stream through the node and checks the
    // emitted track values.
    fn test_staircase_node() {
        let config = StaircaseConfig {
            steps: vec![4.0, 2.0],
            downs: 2,
            ups: 1,
            val_start: 60.0,
            val_floor: 0.0,
            val_ceil: 80.0,
            ..Default::default()
        };
        let mut stair_node = staircase_node(config);

        #[derive(Node)]
        struct ResponderNode {
            responses: Vec<bool>,
            idx: usize,
            pub sender: NodeSender<bool>,
        }

        impl ResponderNode {
            pub fn run(&mut self) -> Result<bool, NodeError> {
                let out = if self.idx < self.responses.len() {
                    self.responses[self.idx]
                } else {
                    false
                };
                self.idx += 1;
                Ok(out)
            }
        }

        #[derive(Node)]
        struct CheckNode {
            input: NodeReceiver<f64>,
            state: Vec<f64>,
        }

        impl CheckNode {
            pub fn run(&mut self, x: f64) -> Result<(), NodeError> {
                self.state.push(x);
                Ok(())
            }
        }

        let mut responder =
            ResponderNode::new(vec![true, true, false, true, true], 0);
        let mut check_node = CheckNode::new(Vec::new());

        connect_nodes!(responder, sender, stair_node, input);
        connect_nodes!(stair_node, sender, check_node, input);
        start_nodes!(responder, stair_node);
        // The block ends after the fifth response, so exactly four track
        // values ever come out.
        let check = thread::spawn(move || {
            for _ in 0..4 {
                check_node.call().unwrap();
            }
            assert_eq!(check_node.state, vec![60.0, 56.0, 58.0, 58.0]);
        });
        assert!(check.join().is_ok());
    }
}

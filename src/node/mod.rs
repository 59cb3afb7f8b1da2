//! Provides an infrastructure to create processing nodes, connect nodes
//! together via crossbeam channels, and start nodes running in their own
//! independent threads.
//!
//! A node is a structure deriving `Node` with fields of type
//! `NodeReceiver<T>` for its inputs and `NodeSender<T>` for its outputs,
//! plus a `run()` method holding the actual computation. Once nodes are
//! connected, each `call()` receives one value per input, executes
//! `run()`, and broadcasts the result to every connected output.
//!
//! # Example
//!
//! ```
//! use hearlab_rs::prelude::*;
//!
//! #[derive(Node)]
//! struct OnesNode {
//!     pub sender: NodeSender<u32>,
//! }
//!
//! impl OnesNode {
//!     pub fn run(&mut self) -> Result<u32, NodeError> {
//!         Ok(1)
//!     }
//! }
//!
//! #[derive(Node)]
//! struct PrintNode {
//!     pub input: NodeReceiver<u32>,
//! }
//!
//! impl PrintNode {
//!     pub fn run(&mut self, x: u32) -> Result<(), NodeError> {
//!         println!("{}", x);
//!         Ok(())
//!     }
//! }
//!
//! let mut ones = OnesNode::new();
//! let mut print = PrintNode::new();
//!
//! // ones will now send its messages to print, which receives them on
//! // its receiver named `input`.
//! hearlab_rs::connect_nodes!(ones, sender, print, input);
//!
//! std::thread::spawn(move || {
//!     ones.call().unwrap();
//! });
//! print.call().unwrap();
//! ```

use std::error;
use std::fmt;

/// The trait that all nodes in the library implement. `call()` executes
/// the node's computation once; `start()` runs it until an error is
/// returned, normally because a channel on either side has disconnected.
pub trait Node {
    fn call(&mut self) -> Result<(), NodeError>;

    fn is_connected(&self) -> bool;

    fn start(&mut self) {
        loop {
            if self.call().is_err() {
                break;
            }
        }
    }
}

/// Errors surfaced by nodes during execution.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeError {
    /// The node is missing a connection on one of its inputs.
    PermanentError,
    /// A channel to a neighboring node has disconnected.
    CommError,
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let desc = match *self {
            NodeError::PermanentError => "Node is not fully connected",
            NodeError::CommError => "Channel to a neighboring node closed",
        };
        write!(f, "Node error: {}", desc)
    }
}

impl error::Error for NodeError {
    fn cause(&self) -> Option<&dyn error::Error> {
        None
    }
}

/// Connects two nodes together with crossbeam channels. The sender node's
/// output named by the second argument feeds the receiver node's input
/// named by the fourth.
///
/// ```
/// # use hearlab_rs::prelude::*;
/// # #[derive(Node)]
/// # struct Node1 { sender: NodeSender<u32> }
/// # impl Node1 { fn run(&mut self) -> Result<u32, NodeError> { Ok(1) } }
/// # #[derive(Node)]
/// # struct Node2 { recv: NodeReceiver<u32> }
/// # impl Node2 { fn run(&mut self, x: u32) -> Result<(), NodeError> { assert_eq!(x, 1); Ok(()) } }
/// let mut node1 = Node1::new();
/// let mut node2 = Node2::new();
///
/// hearlab_rs::connect_nodes!(node1, sender, node2, recv);
/// ```
#[macro_export]
macro_rules! connect_nodes {
    ($n1:ident, $send:ident, $n2:ident, $recv:ident) => {{
        let (send, recv) = $crate::channel::bounded(0);
        $n1.$send.push((send, None));
        $n2.$recv = Some(recv);
    }};
}

/// Spawns a thread for each node in order and runs each node until one of
/// its channels disconnects.
#[macro_export]
macro_rules! start_nodes {
    ($($node:ident),+ $(,)?) => {
        $(
            ::std::thread::spawn(move || {
                $node.start();
            });
        )*
    }
}

#[cfg(test)]
mod test {
    use crate::prelude::*;
    use std::thread;
    use std::time::Instant;

    #[test]
    // Constructs a simple network with two nodes: one source and one sink.
    fn test_simple_nodes() {
        #[derive(Node)]
        struct Node1 {
            sender: NodeSender<u32>,
        }

        impl Node1 {
            pub fn run(&mut self) -> Result<u32, NodeError> {
                Ok(1)
            }
        }

        #[derive(Node)]
        struct Node2 {
            recv1: NodeReceiver<u32>,
        }

        impl Node2 {
            pub fn run(&mut self, x: u32) -> Result<(), NodeError> {
                assert_eq!(x, 1);
                Ok(())
            }
        }

        let mut node1 = Node1::new();
        let mut node2 = Node2::new();
        assert!(!node1.is_connected());
        connect_nodes!(node1, sender, node2, recv1);
        assert!(node1.is_connected());
        assert!(node2.is_connected());
        start_nodes!(node1);
        let check = thread::spawn(move || {
            let now = Instant::now();
            loop {
                node2.call().unwrap();
                if now.elapsed().as_secs() > 1 {
                    break;
                }
            }
        });
        assert!(check.join().is_ok());
    }

    #[test]
    // An unconnected input must surface as a PermanentError rather than
    // hanging.
    fn test_unconnected_call() {
        #[derive(Node)]
        struct LoneNode {
            input: NodeReceiver<u8>,
        }

        impl LoneNode {
            pub fn run(&mut self, _x: u8) -> Result<(), NodeError> {
                Ok(())
            }
        }

        let mut node = LoneNode::new();
        assert_eq!(node.call(), Err(NodeError::PermanentError));
    }
}

//! Order-entry boundary (system → exchange).
//!
//! The core never talks to an exchange directly: the engine hands
//! [`OrderCommand`]s to an [`OrderGateway`]. Both methods must be
//! non-blocking: a real implementation enqueues into an outbound ring
//! and lets its network thread drain it, which is exactly what
//! [`SpscGateway`] does.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tick_core::ring::Producer;
use tick_core::types::{OrderCommand, OrderId, SymbolId, Timestamp};

/// Kind of command carried by a [`GatewayMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandKind {
    NewOrder = 0,
    CancelOrder = 1,
}

/// Envelope placed on the outbound ring for the egress thread.
#[derive(Debug, Clone, Copy)]
pub struct GatewayMessage {
    pub kind: CommandKind,
    pub command: OrderCommand,
    pub timestamp: Timestamp,
}

/// Order-entry contract. Implementations must not block: the engine
/// calls these inside its market-data hot path.
pub trait OrderGateway {
    /// Submit a new order.
    fn send_order(&mut self, cmd: &OrderCommand);

    /// Cancel a resting order.
    fn cancel_order(&mut self, order_id: OrderId, symbol_id: SymbolId);
}

/// Gateway that enqueues commands into an outbound SPSC ring.
///
/// The egress thread owns the consumer half. The ring must be sized so
/// it never fills under peak signal rate; if it does fill, the command
/// is dropped and counted, never blocked on.
pub struct SpscGateway {
    tx: Producer<GatewayMessage>,
    dropped: Arc<AtomicU64>,
}

impl SpscGateway {
    /// Wrap the producer half of an outbound ring.
    pub fn new(tx: Producer<GatewayMessage>) -> Self {
        Self {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Handle for diagnostics threads to read the drop count.
    pub fn drop_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.dropped)
    }

    /// Commands dropped because the outbound ring was full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    fn enqueue(&mut self, kind: CommandKind, command: OrderCommand) {
        let msg = GatewayMessage {
            kind,
            command,
            timestamp: Timestamp::now(),
        };
        if !self.tx.push(msg) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl OrderGateway for SpscGateway {
    #[inline]
    fn send_order(&mut self, cmd: &OrderCommand) {
        self.enqueue(CommandKind::NewOrder, *cmd);
    }

    #[inline]
    fn cancel_order(&mut self, order_id: OrderId, symbol_id: SymbolId) {
        let command = OrderCommand {
            symbol_id,
            order_id,
            ..OrderCommand::default()
        };
        self.enqueue(CommandKind::CancelOrder, command);
    }
}

//! State

use std::sync::Arc;

use crate::forward::Forwarder;

#[derive(Debug, Clone)]
pub(crate) struct State {
    pub(crate) forwarder: Forwarder,
}

impl State {
    #[must_use]
    pub(crate) fn new(forwarder: Forwarder) -> Self {
        Self { forwarder }
    }

    #[must_use]
    pub(crate) fn shared(forwarder: Forwarder) -> Arc<Self> {
        Arc::new(Self::new(forwarder))
    }
}

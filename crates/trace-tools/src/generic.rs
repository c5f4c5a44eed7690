/// The kind of memory access an event represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Read,
    Write,
}

impl Operation {
    /// Returns `true` if the operation is a [`Operation::Read`]
    pub fn is_read(&self) -> bool {
        matches!(self, Operation::Read)
    }
}

/// The format-independent representation of a single memory request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessEvent {
    operation: Operation,
    address: u32,
    timestamp: u64,
}

impl AccessEvent {
    pub fn new(operation: Operation, address: u32, timestamp: u64) -> Self {
        Self {
            operation,
            address,
            timestamp,
        }
    }

    pub fn get_fields(&self) -> (&Operation, &u32, &u64) {
        (&self.operation, &self.address, &self.timestamp)
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn address(&self) -> u32 {
        self.address
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }
}

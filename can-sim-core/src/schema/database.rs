//! Message and signal descriptors
//!
//! Immutable descriptors produced by the DBC loader. Signal names are
//! unique within their owning message; the signal order is the DBC
//! declaration order and is preserved for log output.

/// A complete CAN message definition
#[derive(Debug, Clone)]
pub struct MessageSpec {
    /// CAN message ID (11-bit standard or 29-bit extended)
    pub id: u32,
    /// True if the ID is an extended (29-bit) identifier
    pub is_extended: bool,
    /// Message name
    pub name: String,
    /// Payload size in bytes
    pub size: usize,
    /// Sender ECU name (optional)
    pub sender: Option<String>,
    /// All signals in this message, in declaration order
    pub signals: Vec<SignalSpec>,
}

/// A CAN signal definition
#[derive(Debug, Clone)]
pub struct SignalSpec {
    /// Signal name
    pub name: String,
    /// Start bit in the CAN frame
    pub start_bit: u16,
    /// Length in bits
    pub length: u16,
    /// Byte order for bit packing
    pub byte_order: ByteOrder,
    /// Value type (signed/unsigned) of the raw field
    pub value_type: ValueType,
    /// True if the raw field is an IEEE-754 float (32 or 64 bit)
    pub is_float: bool,
    /// Scale factor converting raw to physical value
    pub factor: f64,
    /// Offset added after scaling
    pub offset: f64,
    /// Declared physical (minimum, maximum), if the DBC provides one.
    /// A DBC range of [0|0] means "no range given" and maps to None.
    pub bounds: Option<(f64, f64)>,
    /// Engineering unit (e.g., "km/h", "V")
    pub unit: Option<String>,
}

/// Byte order for signal packing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian (Intel format)
    LittleEndian,
    /// Big-endian (Motorola format)
    BigEndian,
}

/// Value type for signal interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Signed integer
    Signed,
    /// Unsigned integer
    Unsigned,
}

/// The loaded message set, read-only after startup
#[derive(Debug, Clone, Default)]
pub struct Schema {
    messages: Vec<MessageSpec>,
}

impl Schema {
    /// Create a new empty schema
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Add a message definition
    pub fn add_message(&mut self, message: MessageSpec) {
        self.messages.push(message);
    }

    /// All message definitions, in file order
    pub fn messages(&self) -> &[MessageSpec] {
        &self.messages
    }

    /// True if no messages were loaded
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Get schema statistics
    pub fn stats(&self) -> SchemaStats {
        SchemaStats {
            num_messages: self.messages.len(),
            num_signals: self.messages.iter().map(|m| m.signals.len()).sum(),
        }
    }
}

/// Schema statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaStats {
    /// Total number of message definitions
    pub num_messages: usize,
    /// Total number of signal definitions
    pub num_signals: usize,
}

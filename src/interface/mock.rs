//! In-memory register file for host-side runs and tests.
//!
//! Records every transaction and allows pre-programming register contents,
//! read sequences, self-clearing bits and bus faults.

use std::collections::{HashMap, VecDeque};

use super::SensorInterface;

/// Register transaction, for test verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    /// Burst read starting at `reg`
    Read { reg: u8, len: usize },
    /// Burst write starting at `reg`
    Write { reg: u8, data: Vec<u8> },
}

/// Fault reported by [`MockRegisters`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockError {
    /// Access touched a register marked as failing
    Nack(u8),
}

/// Simulated sensor register map
#[derive(Debug, Clone)]
pub struct MockRegisters {
    regs: [u8; 256],
    transactions: Vec<Transaction>,
    self_clearing: Vec<(u8, u8)>,
    scripted: HashMap<u8, VecDeque<u8>>,
    failing: Vec<u8>,
}

impl Default for MockRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRegisters {
    pub fn new() -> Self {
        Self {
            regs: [0; 256],
            transactions: Vec::new(),
            self_clearing: Vec::new(),
            scripted: HashMap::new(),
            failing: Vec::new(),
        }
    }

    /// Seed consecutive registers starting at `reg`
    pub fn set_registers(&mut self, reg: u8, data: &[u8]) {
        for (i, b) in data.iter().enumerate() {
            self.regs[(reg as usize + i) & 0xFF] = *b;
        }
    }

    pub fn set_register(&mut self, reg: u8, value: u8) {
        self.regs[reg as usize] = value;
    }

    pub fn register(&self, reg: u8) -> u8 {
        self.regs[reg as usize]
    }

    /// Bits in `mask` of `reg` read back as zero right after being written,
    /// like a reset or boot request that completes immediately
    pub fn self_clearing(&mut self, reg: u8, mask: u8) {
        self.self_clearing.push((reg, mask));
    }

    /// Successive reads of `reg` return `values` in order, then fall back
    /// to the stored register content
    pub fn script_reads(&mut self, reg: u8, values: &[u8]) {
        self.scripted
            .entry(reg)
            .or_default()
            .extend(values.iter().copied());
    }

    /// Every access that touches `reg` fails
    pub fn fail_register(&mut self, reg: u8) {
        self.failing.push(reg);
    }

    /// Get transaction log
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Only the writes, in order, as `(reg, data)`
    pub fn writes(&self) -> Vec<(u8, Vec<u8>)> {
        self.transactions
            .iter()
            .filter_map(|t| match t {
                Transaction::Write { reg, data } => Some((*reg, data.clone())),
                Transaction::Read { .. } => None,
            })
            .collect()
    }

    /// Clear transaction log
    pub fn clear_transactions(&mut self) {
        self.transactions.clear();
    }

    fn check_fault(&self, reg: u8, len: usize) -> Result<(), MockError> {
        let end = reg as usize + len;
        match self
            .failing
            .iter()
            .find(|&&r| (r as usize) >= reg as usize && (r as usize) < end)
        {
            Some(&r) => Err(MockError::Nack(r)),
            None => Ok(()),
        }
    }
}

impl SensorInterface for MockRegisters {
    type InterfaceError = MockError;

    fn read_registers(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), MockError> {
        self.transactions.push(Transaction::Read {
            reg,
            len: buf.len(),
        });
        self.check_fault(reg, buf.len())?;

        for (i, b) in buf.iter_mut().enumerate() {
            let addr = ((reg as usize + i) & 0xFF) as u8;
            *b = match self.scripted.get_mut(&addr).and_then(|q| q.pop_front()) {
                Some(v) => v,
                None => self.regs[addr as usize],
            };
        }
        Ok(())
    }

    fn write_registers(&mut self, reg: u8, data: &[u8]) -> Result<(), MockError> {
        self.transactions.push(Transaction::Write {
            reg,
            data: data.to_vec(),
        });
        self.check_fault(reg, data.len())?;

        for (i, b) in data.iter().enumerate() {
            let addr = (reg as usize + i) & 0xFF;
            self.regs[addr] = *b;
            for &(r, mask) in &self.self_clearing {
                if r as usize == addr {
                    self.regs[addr] &= !mask;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_write_then_read() {
        let mut bus = MockRegisters::new();
        bus.write_registers(0x10, &[0x11, 0x22]).unwrap();

        let mut buf = [0u8; 2];
        bus.read_registers(0x10, &mut buf).unwrap();
        assert_eq!(buf, [0x11, 0x22]);
        assert_eq!(
            bus.transactions(),
            &[
                Transaction::Write {
                    reg: 0x10,
                    data: vec![0x11, 0x22]
                },
                Transaction::Read { reg: 0x10, len: 2 },
            ]
        );
    }

    #[test]
    fn test_mock_scripted_reads_fall_back() {
        let mut bus = MockRegisters::new();
        bus.set_register(0x1E, 0x07);
        bus.script_reads(0x1E, &[0x00, 0x01]);

        assert_eq!(bus.read_register(0x1E).unwrap(), 0x00);
        assert_eq!(bus.read_register(0x1E).unwrap(), 0x01);
        assert_eq!(bus.read_register(0x1E).unwrap(), 0x07);
    }

    #[test]
    fn test_mock_self_clearing() {
        let mut bus = MockRegisters::new();
        bus.self_clearing(0x12, 0x01);
        bus.write_register(0x12, 0x45).unwrap();
        assert_eq!(bus.register(0x12), 0x44);
    }

    #[test]
    fn test_mock_fault() {
        let mut bus = MockRegisters::new();
        bus.fail_register(0x29);
        let mut buf = [0u8; 6];
        assert_eq!(
            bus.read_registers(0x28, &mut buf),
            Err(MockError::Nack(0x29))
        );
        assert!(bus.read_register(0x27).is_ok());
    }
}

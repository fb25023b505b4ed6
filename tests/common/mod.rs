//! Simulated LPS22HB on a recording I2C bus

use std::collections::VecDeque;

use embedded_hal::blocking::i2c::{Write, WriteRead};
use lps22hb_rs::registers::{Register, IF_ADD_INC, SAMPLE_LEN, SWRESET};

pub const ADDRESS: u8 = 0x5C;

const OUT_FIRST: u8 = 0x28;
const OUT_LAST: u8 = 0x2C;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockError {
    Nack,
}

/// I2C transaction type for logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    Write { addr: u8, data: Vec<u8> },
    WriteRead { addr: u8, reg: u8, len: usize },
}

impl Transaction {
    pub fn write(data: &[u8]) -> Self {
        Transaction::Write {
            addr: ADDRESS,
            data: data.to_vec(),
        }
    }

    pub fn read(reg: Register, len: usize) -> Self {
        Transaction::WriteRead {
            addr: ADDRESS,
            reg: reg.addr(),
            len,
        }
    }

    pub fn read_at(reg: u8, len: usize) -> Self {
        Transaction::WriteRead {
            addr: ADDRESS,
            reg,
            len,
        }
    }
}

/// Register file with the device's address auto-increment and output FIFO.
///
/// While `fifo` holds samples, the output registers show its head and reading
/// `TEMP_OUT_H` pops it; `FIFO_STATUS` then reports the queue length.
#[derive(Debug)]
pub struct MockLps22hb {
    pub regs: [u8; 0x40],
    pub fifo: VecDeque<[u8; SAMPLE_LEN]>,
    transactions: Vec<Transaction>,
    fail_at: Option<usize>,
}

impl MockLps22hb {
    pub fn new() -> Self {
        let mut mock = Self {
            regs: [0; 0x40],
            fifo: VecDeque::new(),
            transactions: Vec::new(),
            fail_at: None,
        };
        mock.power_on();
        mock
    }

    fn power_on(&mut self) {
        self.regs = [0; 0x40];
        self.regs[Register::WhoAmI.addr() as usize] = 0xB1;
        self.regs[Register::CtrlReg2.addr() as usize] = IF_ADD_INC;
    }

    pub fn set(&mut self, reg: Register, value: u8) {
        self.regs[reg.addr() as usize] = value;
    }

    pub fn get(&self, reg: Register) -> u8 {
        self.regs[reg.addr() as usize]
    }

    pub fn set_output(&mut self, raw: [u8; SAMPLE_LEN]) {
        let start = OUT_FIRST as usize;
        self.regs[start..start + SAMPLE_LEN].copy_from_slice(&raw);
    }

    pub fn push_sample(&mut self, raw: [u8; SAMPLE_LEN]) {
        self.fifo.push_back(raw);
    }

    /// Makes the `index`-th transaction (0-based) fail.
    pub fn fail_at(&mut self, index: usize) {
        self.fail_at = Some(index);
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.transactions.clone()
    }

    pub fn clear_transactions(&mut self) {
        self.transactions.clear();
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.transactions
            .iter()
            .filter_map(|t| match t {
                Transaction::Write { data, .. } => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    fn log(&mut self, transaction: Transaction) -> Result<(), MockError> {
        let index = self.transactions.len();
        let addr = match &transaction {
            Transaction::Write { addr, .. } | Transaction::WriteRead { addr, .. } => *addr,
        };
        self.transactions.push(transaction);

        if addr != ADDRESS || self.fail_at == Some(index) {
            return Err(MockError::Nack);
        }
        Ok(())
    }

    fn auto_increment(&self) -> bool {
        self.get(Register::CtrlReg2) & IF_ADD_INC != 0
    }

    fn next(&self, reg: u8) -> u8 {
        if !self.auto_increment() {
            reg
        } else if reg == OUT_LAST {
            OUT_FIRST
        } else {
            reg + 1
        }
    }

    fn read_one(&mut self, reg: u8) -> u8 {
        if reg == Register::FifoStatus.addr() && !self.fifo.is_empty() {
            return self.fifo.len() as u8;
        }

        if (OUT_FIRST..=OUT_LAST).contains(&reg) {
            if let Some(head) = self.fifo.front() {
                let value = head[(reg - OUT_FIRST) as usize];
                if reg == OUT_LAST {
                    self.fifo.pop_front();
                }
                return value;
            }
        }

        self.regs[reg as usize]
    }

    fn write_one(&mut self, reg: u8, value: u8) {
        if reg == Register::CtrlReg2.addr() && value & SWRESET != 0 {
            self.power_on();
            return;
        }
        self.regs[reg as usize] = value;
    }
}

impl Write for MockLps22hb {
    type Error = MockError;

    fn write(&mut self, addr: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        self.log(Transaction::Write {
            addr,
            data: bytes.to_vec(),
        })?;

        if let Some((first, data)) = bytes.split_first() {
            let mut reg = *first;
            for value in data {
                self.write_one(reg, *value);
                reg = self.next(reg);
            }
        }
        Ok(())
    }
}

impl WriteRead for MockLps22hb {
    type Error = MockError;

    fn write_read(&mut self, addr: u8, bytes: &[u8], buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.log(Transaction::WriteRead {
            addr,
            reg: bytes[0],
            len: buffer.len(),
        })?;

        let mut reg = bytes[0];
        for slot in buffer.iter_mut() {
            *slot = self.read_one(reg);
            reg = self.next(reg);
        }
        Ok(())
    }
}

/// Output block for `hpa` and `celsius`, encoded as the device does.
pub fn raw_sample(hpa: f32, celsius: f32) -> [u8; SAMPLE_LEN] {
    let pressure = (hpa * 4096.0) as i32;
    let temperature = (celsius * 100.0) as i16;
    let p = pressure.to_le_bytes();
    let t = temperature.to_le_bytes();
    [p[0], p[1], p[2], t[0], t[1]]
}

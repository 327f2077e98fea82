//! In-process multi-signature account and gas meter for exercising the module.

use std::{
    cell::Cell,
    collections::{BTreeMap, BTreeSet},
    fmt,
    rc::Rc,
};

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::{SolCall, SolStruct};
use k256::ecdsa::SigningKey;
use relay_refund_types::{hash_account_transaction, AccountTransaction, CallKind};
use relay_terms_encoder::encoder::{sign_digest, signer_address};

use crate::{
    account::{IRelayAccount, SmartAccount, IERC20},
    errors::AccountError,
    gas::GasMeter,
    utils::crypto::check_owner_signatures,
};

/// Test key pair with a deterministic secret.
pub struct Owner {
    pub key: SigningKey,
    pub address: Address,
}

impl Owner {
    pub fn new(seed: u8) -> Self {
        let key = SigningKey::from_slice(&[seed; 32]).unwrap();
        let address = signer_address(&key);
        Self { key, address }
    }

    pub fn sign(&self, digest: B256) -> [u8; 65] {
        sign_digest(digest, &self.key).unwrap()
    }
}

/// Gas meter whose reading the test (and the mock account) moves by hand.
#[derive(Clone, Debug)]
pub struct ManualGasMeter {
    left: Rc<Cell<u64>>,
}

impl ManualGasMeter {
    pub fn new(gas_left: u64) -> Self {
        Self {
            left: Rc::new(Cell::new(gas_left)),
        }
    }

    pub fn burn(&self, amount: u64) {
        self.left.set(self.left.get().saturating_sub(amount));
    }

    pub fn set(&self, gas_left: u64) {
        self.left.set(gas_left);
    }
}

impl GasMeter for ManualGasMeter {
    fn gas_left(&self) -> u64 {
        self.left.get()
    }
}

/// How a mocked token answers `transfer`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenBehaviour {
    /// Moves the balance and returns ABI `true`.
    Standard,
    /// Moves the balance and returns nothing.
    NoReturn,
    ReturnsFalse,
    Reverts,
    /// Returns bytes that do not decode as a bool.
    Malformed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutedCall {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub operation: CallKind,
}

/// Everything a revert must restore.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MockAccountState {
    pub nonce: U256,
    pub native_balance: U256,
    pub native_received: BTreeMap<Address, U256>,
    pub token_balances: BTreeMap<(Address, Address), U256>,
    pub executed: Vec<ExecutedCall>,
}

type Hook = Box<dyn FnMut() -> bool>;

pub struct MockAccount {
    address: Address,
    chain_id: u64,
    owners: BTreeSet<Address>,
    threshold: usize,
    modules: BTreeSet<Address>,
    tokens: BTreeMap<Address, TokenBehaviour>,
    meter: Option<ManualGasMeter>,
    exec_gas: u64,
    hook: Option<Hook>,
    pub state: MockAccountState,
}

impl fmt::Debug for MockAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockAccount")
            .field("address", &self.address)
            .field("threshold", &self.threshold)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

pub struct MockAccountBuilder {
    account: MockAccount,
}

impl MockAccountBuilder {
    pub fn chain_id(mut self, chain_id: u64) -> Self {
        self.account.chain_id = chain_id;
        self
    }

    pub fn owners(mut self, owners: &[Owner]) -> Self {
        self.account.owners.extend(owners.iter().map(|o| o.address));
        self
    }

    pub fn threshold(mut self, threshold: usize) -> Self {
        self.account.threshold = threshold;
        self
    }

    pub fn module(mut self, module: Address) -> Self {
        self.account.modules.insert(module);
        self
    }

    pub fn native_balance(mut self, balance: U256) -> Self {
        self.account.state.native_balance = balance;
        self
    }

    pub fn token(mut self, token: Address, behaviour: TokenBehaviour, balance: U256) -> Self {
        self.account.tokens.insert(token, behaviour);
        self.account
            .state
            .token_balances
            .insert((token, self.account.address), balance);
        self
    }

    /// Burn `exec_gas` on `meter` every time the account executes a transaction.
    pub fn meter(mut self, meter: &ManualGasMeter, exec_gas: u64) -> Self {
        self.account.meter = Some(meter.clone());
        self.account.exec_gas = exec_gas;
        self
    }

    pub fn build(self) -> MockAccount {
        self.account
    }
}

fn bool_word(value: bool) -> Bytes {
    let mut word = [0u8; 32];
    word[31] = u8::from(value);
    Bytes::copy_from_slice(&word)
}

impl MockAccount {
    pub fn builder(address: Address) -> MockAccountBuilder {
        MockAccountBuilder {
            account: MockAccount {
                address,
                chain_id: 1,
                owners: BTreeSet::new(),
                threshold: 0,
                modules: BTreeSet::new(),
                tokens: BTreeMap::new(),
                meter: None,
                exec_gas: 0,
                hook: None,
                state: MockAccountState::default(),
            },
        }
    }

    /// Run `hook` while executing the owners' transaction; returning `false` makes it fail.
    pub fn on_execute(&mut self, hook: impl FnMut() -> bool + 'static) {
        self.hook = Some(Box::new(hook));
    }

    pub fn native_received(&self, to: Address) -> U256 {
        self.state
            .native_received
            .get(&to)
            .copied()
            .unwrap_or_default()
    }

    pub fn token_balance(&self, token: Address, holder: Address) -> U256 {
        self.state
            .token_balances
            .get(&(token, holder))
            .copied()
            .unwrap_or_default()
    }

    /// Typed transaction the owners must sign for the next execution.
    pub fn transaction(&self, to: Address, value: U256, data: Bytes, operation: CallKind) -> AccountTransaction {
        AccountTransaction {
            account: self.address,
            to,
            value,
            data,
            operation: operation.into(),
            nonce: self.state.nonce,
        }
    }

    fn dispatch(&mut self, to: Address, value: U256, data: &[u8], operation: CallKind) -> (bool, Bytes) {
        let result = match self.tokens.get(&to).copied() {
            Some(behaviour) if data.starts_with(&IERC20::transferCall::SELECTOR) => {
                self.token_transfer(to, behaviour, data)
            }
            _ => self.native_transfer(to, value),
        };
        if result.0 {
            self.state.executed.push(ExecutedCall {
                to,
                value,
                data: Bytes::copy_from_slice(data),
                operation,
            });
        }
        result
    }

    fn native_transfer(&mut self, to: Address, value: U256) -> (bool, Bytes) {
        if value > self.state.native_balance {
            return (false, Bytes::new());
        }
        self.state.native_balance -= value;
        *self.state.native_received.entry(to).or_default() += value;
        (true, Bytes::new())
    }

    fn token_transfer(&mut self, token: Address, behaviour: TokenBehaviour, data: &[u8]) -> (bool, Bytes) {
        let Ok(call) = IERC20::transferCall::abi_decode(data, true) else {
            return (false, Bytes::new());
        };
        match behaviour {
            TokenBehaviour::Reverts => return (false, Bytes::new()),
            TokenBehaviour::ReturnsFalse => return (true, bool_word(false)),
            TokenBehaviour::Malformed => return (true, Bytes::from_static(&[0xde, 0xad, 0xbe])),
            TokenBehaviour::Standard | TokenBehaviour::NoReturn => {}
        }

        let balance = self.token_balance(token, self.address);
        if balance < call.amount {
            return (false, Bytes::new());
        }
        self.state
            .token_balances
            .insert((token, self.address), balance - call.amount);
        *self.state.token_balances.entry((token, call.to)).or_default() += call.amount;

        match behaviour {
            TokenBehaviour::Standard => (true, bool_word(true)),
            _ => (true, Bytes::new()),
        }
    }
}

impl SmartAccount for MockAccount {
    type Checkpoint = MockAccountState;

    fn address(&self) -> Address {
        self.address
    }

    fn nonce(&self) -> U256 {
        self.state.nonce
    }

    fn check_signatures(&self, data_hash: B256, data: &[u8], signatures: &[u8]) -> Result<(), AccountError> {
        self.check_n_signatures(data_hash, data, signatures, self.threshold)
    }

    fn check_n_signatures(
        &self,
        data_hash: B256,
        _data: &[u8],
        signatures: &[u8],
        required: usize,
    ) -> Result<(), AccountError> {
        if self.threshold == 0 {
            return Err(AccountError::NotSetUp);
        }
        check_owner_signatures(&self.owners, data_hash, signatures, required)
    }

    fn exec_transaction(&mut self, call_data: &[u8]) -> bool {
        let Ok(call) = IRelayAccount::execTransactionCall::abi_decode(call_data, true) else {
            return false;
        };
        let Ok(operation) = CallKind::try_from(call.operation) else {
            return false;
        };
        let tx = self.transaction(call.to, call.value, call.data.clone(), operation);
        let digest = hash_account_transaction(self.chain_id, &tx);
        if self
            .check_signatures(digest, &tx.eip712_encode_data(), &call.signatures)
            .is_err()
        {
            return false;
        }
        self.state.nonce += U256::from(1u64);

        if let Some(meter) = &self.meter {
            meter.burn(self.exec_gas);
        }
        if let Some(hook) = self.hook.as_mut() {
            if !hook() {
                return false;
            }
        }
        self.dispatch(call.to, call.value, &call.data, operation).0
    }

    fn exec_transaction_from_module(
        &mut self,
        module: Address,
        to: Address,
        value: U256,
        data: &[u8],
        operation: CallKind,
    ) -> (bool, Bytes) {
        if !self.modules.contains(&module) {
            return (false, Bytes::new());
        }
        self.dispatch(to, value, data, operation)
    }

    fn checkpoint(&self) -> MockAccountState {
        self.state.clone()
    }

    fn revert_to(&mut self, checkpoint: MockAccountState) {
        self.state = checkpoint;
    }
}

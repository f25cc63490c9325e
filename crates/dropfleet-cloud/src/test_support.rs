//! In-memory provider used by the unit tests

use crate::error::{CloudError, Result};
use crate::machine::{Machine, MachineSize};
use crate::provider::{ComputeProvider, MachineSpec, SshKey};
use async_trait::async_trait;
use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::sync::Mutex;

#[derive(Default)]
struct FakeState {
    machines: Vec<Machine>,
    keys: Vec<SshKey>,
    next_id: u64,
    create_calls: usize,
    get_calls: usize,
    delete_calls: usize,
    list_calls: usize,
    size_calls: usize,
    specs: Vec<MachineSpec>,
}

/// Records every call and keeps machines in a vector
pub struct FakeProvider {
    state: Mutex<FakeState>,
    failing_deletes: HashSet<u64>,
    fail_key_registration: bool,
    fail_create_at: Option<usize>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                next_id: 1000,
                ..Default::default()
            }),
            failing_deletes: HashSet::new(),
            fail_key_registration: false,
            fail_create_at: None,
        }
    }

    pub fn with_machines(self, machines: Vec<Machine>) -> Self {
        self.state.lock().unwrap().machines = machines;
        self
    }

    /// Deletion of `id` answers 500
    pub fn failing_delete(mut self, id: u64) -> Self {
        self.failing_deletes.insert(id);
        self
    }

    pub fn failing_key_registration(mut self) -> Self {
        self.fail_key_registration = true;
        self
    }

    /// The nth create call (1-based) fails with a transport error
    pub fn failing_create_at(mut self, n: usize) -> Self {
        self.fail_create_at = Some(n);
        self
    }

    pub fn create_calls(&self) -> usize {
        self.state.lock().unwrap().create_calls
    }

    pub fn get_calls(&self) -> usize {
        self.state.lock().unwrap().get_calls
    }

    pub fn delete_calls(&self) -> usize {
        self.state.lock().unwrap().delete_calls
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }

    pub fn total_calls(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.create_calls
            + state.get_calls
            + state.delete_calls
            + state.list_calls
            + state.size_calls
            + state.keys.len()
    }

    pub fn specs(&self) -> Vec<MachineSpec> {
        self.state.lock().unwrap().specs.clone()
    }

    pub fn registered_keys(&self) -> Vec<SshKey> {
        self.state.lock().unwrap().keys.clone()
    }

    pub fn machines(&self) -> Vec<Machine> {
        self.state.lock().unwrap().machines.clone()
    }
}

#[async_trait]
impl ComputeProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    async fn list_machines(&self) -> Result<Vec<Machine>> {
        let mut state = self.state.lock().unwrap();
        state.list_calls += 1;
        Ok(state.machines.clone())
    }

    async fn get_machine(&self, id: u64) -> Result<Machine> {
        let mut state = self.state.lock().unwrap();
        state.get_calls += 1;
        state
            .machines
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| CloudError::Api {
                endpoint: "get droplet".into(),
                status: 404,
                message: format!("droplet {} not found", id),
            })
    }

    async fn create_machine(&self, spec: &MachineSpec) -> Result<Machine> {
        let mut state = self.state.lock().unwrap();
        state.create_calls += 1;
        if self.fail_create_at == Some(state.create_calls) {
            return Err(CloudError::Transport("connection reset".into()));
        }
        state.specs.push(spec.clone());

        state.next_id += 1;
        let id = state.next_id;
        let octet = (id % 250) as u8;
        // the read-back record carries the address and size, the create
        // response does not
        let stored = Machine::new(id, &spec.name, &spec.region, &spec.size, &spec.image)
            .with_address(Ipv4Addr::new(203, 0, 113, octet));
        state.machines.push(stored);

        Ok(Machine::new(id, &spec.name, &spec.region, "", &spec.image))
    }

    async fn delete_machine(&self, id: u64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.delete_calls += 1;
        if self.failing_deletes.contains(&id) {
            return Err(CloudError::Api {
                endpoint: "delete droplet".into(),
                status: 500,
                message: "internal error".into(),
            });
        }
        state.machines.retain(|m| m.id != id);
        Ok(())
    }

    async fn list_sizes(&self) -> Result<Vec<MachineSize>> {
        self.state.lock().unwrap().size_calls += 1;
        Ok(Vec::new())
    }

    async fn register_ssh_key(&self, name: &str, _public_key: &str) -> Result<SshKey> {
        if self.fail_key_registration {
            return Err(CloudError::Api {
                endpoint: "register ssh key".into(),
                status: 422,
                message: "SSH Key is already in use on your account".into(),
            });
        }
        let mut state = self.state.lock().unwrap();
        let key = SshKey {
            id: 512190 + state.keys.len() as u64,
            name: name.to_string(),
            fingerprint: String::new(),
        };
        state.keys.push(key.clone());
        Ok(key)
    }
}

//! Shared fixtures for integration tests.

#![allow(dead_code)]

use vm_reconciler::model::{
    ExtraConfigValue, LiveAllocation, LiveBootOptions, LiveFlags, LiveHardware, LiveOption, LiveShares,
    LiveSnapshot, LiveTools, UpdateRequest,
};
use vm_reconciler::store::{ApiError, VirtualMachineApi};

/// A running two-vCPU instance with one cloud-init key and one key owned by
/// guest tools.
pub fn web_vm() -> LiveSnapshot {
    LiveSnapshot {
        name: Some("web-01".to_string()),
        guest_id: Some("ubuntu64Guest".to_string()),
        alternate_guest_name: Some(String::new()),
        annotation: Some(String::new()),
        hardware: Some(LiveHardware {
            num_cpu: 2,
            num_cores_per_socket: Some(1),
            memory_mb: 2048,
        }),
        cpu_hot_add_enabled: Some(false),
        cpu_hot_remove_enabled: Some(false),
        memory_hot_add_enabled: Some(true),
        nested_hv_enabled: Some(false),
        vpmc_enabled: Some(false),
        swap_placement: Some("inherit".to_string()),
        firmware: Some("efi".to_string()),
        tools: Some(LiveTools {
            sync_time_with_host: Some(true),
            after_power_on: Some(true),
            after_resume: Some(true),
            before_guest_standby: Some(true),
            before_guest_shutdown: Some(true),
            before_guest_reboot: Some(false),
        }),
        flags: Some(LiveFlags {
            disk_uuid_enabled: Some(true),
            virtual_exec_usage: Some("hvAuto".to_string()),
            virtual_mmu_usage: Some("automatic".to_string()),
            enable_logging: Some(true),
        }),
        boot_options: Some(LiveBootOptions {
            boot_delay: Some(0),
            efi_secure_boot_enabled: Some(true),
            boot_retry_enabled: Some(false),
            boot_retry_delay: Some(10_000),
        }),
        cpu_allocation: Some(allocation("normal", 2000)),
        memory_allocation: Some(allocation("normal", 20480)),
        extra_config: vec![
            LiveOption::new("guestinfo.userdata", "I2Nsb3VkLWNvbmZpZwo="),
            LiveOption::new("vmware.tools.internalversion", "10346"),
        ],
        change_version: Some("2026-10-01T12:00:00.000000Z".to_string()),
        uuid: Some("4230-8f1e".to_string()),
    }
}

pub fn allocation(level: &str, shares: i32) -> LiveAllocation {
    LiveAllocation {
        limit: Some(-1),
        reservation: Some(0),
        shares: Some(LiveShares {
            level: level.to_string(),
            shares,
        }),
    }
}

/// Applies update requests to an in-memory instance the way the platform
/// would, and remembers every request it was sent.
pub struct SimulatedPlatform {
    pub vm: LiveSnapshot,
    pub requests: Vec<UpdateRequest>,
}

impl SimulatedPlatform {
    pub fn new(vm: LiveSnapshot) -> Self {
        Self {
            vm,
            requests: Vec::new(),
        }
    }

    pub fn extra_value(&self, key: &str) -> Option<&str> {
        self.vm
            .extra_config
            .iter()
            .find(|opt| opt.key == key)
            .map(|opt| opt.value.as_str())
    }
}

impl VirtualMachineApi for SimulatedPlatform {
    fn reconfigure(&mut self, req: &UpdateRequest) -> Result<LiveSnapshot, ApiError> {
        self.requests.push(req.clone());

        let memory_mb = i32::try_from(req.memory_mb).map_err(|_| ApiError::Rejected("memory out of range".into()))?;
        let vm = &mut self.vm;
        vm.name = Some(req.name.clone());
        vm.guest_id = Some(req.guest_id.clone());
        vm.alternate_guest_name = Some(req.alternate_guest_name.clone());
        vm.annotation = Some(req.annotation.clone());
        vm.hardware = Some(LiveHardware {
            num_cpu: req.num_cpus,
            num_cores_per_socket: Some(req.num_cores_per_socket),
            memory_mb,
        });
        vm.cpu_hot_add_enabled = Some(req.cpu_hot_add_enabled);
        vm.cpu_hot_remove_enabled = Some(req.cpu_hot_remove_enabled);
        vm.memory_hot_add_enabled = Some(req.memory_hot_add_enabled);
        vm.nested_hv_enabled = Some(req.nested_hv_enabled);
        vm.vpmc_enabled = Some(req.vpmc_enabled);
        vm.swap_placement = Some(req.swap_placement.to_string());
        vm.firmware = Some(req.firmware.to_string());
        vm.tools = Some(LiveTools {
            sync_time_with_host: Some(req.tools.sync_time_with_host),
            after_power_on: Some(req.tools.after_power_on),
            after_resume: Some(req.tools.after_resume),
            before_guest_standby: Some(req.tools.before_guest_standby),
            before_guest_shutdown: Some(req.tools.before_guest_shutdown),
            before_guest_reboot: Some(req.tools.before_guest_reboot),
        });
        vm.flags = Some(LiveFlags {
            disk_uuid_enabled: Some(req.flags.disk_uuid_enabled),
            virtual_exec_usage: Some(req.flags.virtual_exec_usage.to_string()),
            virtual_mmu_usage: Some(req.flags.virtual_mmu_usage.to_string()),
            enable_logging: Some(req.flags.enable_logging),
        });
        vm.boot_options = Some(LiveBootOptions {
            boot_delay: Some(req.boot_options.boot_delay),
            efi_secure_boot_enabled: Some(req.boot_options.efi_secure_boot_enabled),
            boot_retry_enabled: Some(req.boot_options.boot_retry_enabled),
            boot_retry_delay: Some(req.boot_options.boot_retry_delay),
        });
        for (live, wanted) in [
            (&mut vm.cpu_allocation, &req.cpu_allocation),
            (&mut vm.memory_allocation, &req.memory_allocation),
        ] {
            *live = Some(LiveAllocation {
                limit: Some(wanted.limit),
                reservation: Some(wanted.reservation),
                shares: Some(LiveShares {
                    level: wanted.shares.level.to_string(),
                    shares: wanted.shares.count,
                }),
            });
        }

        for entry in req.extra_config.entries() {
            match &entry.value {
                ExtraConfigValue::Tombstone => vm.extra_config.retain(|opt| opt.key != entry.key),
                ExtraConfigValue::Set(value) => match vm.extra_config.iter_mut().find(|opt| opt.key == entry.key) {
                    Some(opt) => opt.value = value.clone(),
                    None => vm.extra_config.push(LiveOption::new(entry.key.clone(), value.clone())),
                },
            }
        }

        Ok(self.vm.clone())
    }
}

//! Host metrics read directly from the OS through `sysinfo`.

use std::thread;

use sysinfo::{Components, CpuRefreshKind, MemoryRefreshKind, ProcessesToUpdate, RefreshKind, System};

use crate::core::providers::SystemStats;
use crate::core::stats::{bytes_to_gb, long_uptime_display, percentage, uptime_days};

/// Readings outside this open range are sensor noise
const PLAUSIBLE_CELSIUS: (f64, f64) = (0.0, 150.0);

/// Sensor label fragments that usually mean "the CPU package"
const PREFERRED_SENSORS: &[&str] = &[
    "package id 0",
    "core 0",
    "cpu_thermal",
    "tctl",
    "acpi",
    "thermal_zone0",
];

fn plausible(celsius: f64) -> bool {
    celsius > PLAUSIBLE_CELSIUS.0 && celsius < PLAUSIBLE_CELSIUS.1
}

/// Pick the CPU temperature from `(label, reading)` pairs.
///
/// A preferred sensor (or the only sensor) with a plausible reading wins; then
/// any plausible reading; otherwise 0.
pub fn select_cpu_temperature(readings: &[(String, Option<f32>)]) -> f64 {
    let sole = readings.len() == 1;

    let preferred = readings.iter().find_map(|(label, value)| {
        let label = label.to_lowercase();
        let wanted = sole || PREFERRED_SENSORS.iter().any(|s| label.contains(s));
        value
            .map(f64::from)
            .filter(|c| wanted && plausible(*c))
    });

    preferred
        .or_else(|| {
            readings
                .iter()
                .filter_map(|(_, value)| value.map(f64::from))
                .find(|c| plausible(*c))
        })
        .unwrap_or(0.0)
}

/// Sample the local host. Blocks for the minimum CPU sampling interval.
pub fn collect_local_stats() -> SystemStats {
    let refresh_kind = RefreshKind::nothing()
        .with_cpu(CpuRefreshKind::nothing().with_cpu_usage())
        .with_memory(MemoryRefreshKind::nothing().with_ram());
    let mut system = System::new_with_specifics(refresh_kind);

    // CPU usage is a delta between two refreshes
    thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    system.refresh_cpu_usage();
    system.refresh_memory();
    system.refresh_processes(ProcessesToUpdate::All, true);

    let components = Components::new_with_refreshed_list();
    let readings: Vec<(String, Option<f32>)> = components
        .iter()
        .map(|c| (c.label().to_string(), c.temperature()))
        .collect();

    let total = system.total_memory() as f64;
    let used = system.used_memory() as f64;
    let uptime = System::uptime();

    let mut stats = SystemStats::default();
    stats.cpu.usage = f64::from(system.global_cpu_usage());
    stats.cpu.temperature = select_cpu_temperature(&readings);
    stats.memory.used = bytes_to_gb(used);
    stats.memory.total = bytes_to_gb(total);
    stats.memory.percentage = percentage(used, total);
    stats.uptime.days = uptime_days(uptime);
    stats.uptime.display = long_uptime_display(uptime);
    stats.load_average = System::load_average().one;
    stats.processes = system.processes().len() as u64;
    stats
}

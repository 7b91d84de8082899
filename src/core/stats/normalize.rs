//! Pure derivations shared across adapters.

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;
const SECS_PER_DAY: u64 = 24 * 3600;
const SECS_PER_HOUR: u64 = 3600;

/// `numerator / denominator * 100`, exactly 0 when the denominator is not positive
pub fn percentage(numerator: f64, denominator: f64) -> f64 {
    if denominator <= 0.0 {
        return 0.0;
    }
    numerator / denominator * 100.0
}

/// Bytes to gigabytes (1024³)
pub fn bytes_to_gb(bytes: f64) -> f64 {
    bytes / BYTES_PER_GB
}

/// Completion of a download queue given `(size, sizeleft)` pairs.
///
/// Records without a positive size are ignored; an empty or sizeless queue is 0.
pub fn queue_progress<I>(records: I) -> f64
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let (total, completed) = records
        .into_iter()
        .filter(|(size, _)| *size > 0.0)
        .fold((0.0, 0.0), |(total, completed), (size, left)| {
            (total + size, completed + (size - left))
        });
    percentage(completed, total)
}

/// What a media manager's root folder is expected to look like
#[derive(Debug, Clone, Copy)]
pub struct DiskNeedle<'a> {
    pub path: &'a str,
    pub label: &'a str,
    /// Used when nothing matches and the list is long enough
    pub fallback_index: usize,
}

/// Pick which entry of a disk-space listing describes the media library.
///
/// Takes `(path, label)` pairs in listing order. Heuristic: first entry whose
/// path or label matches the needle, else the fallback index when in range,
/// else the first entry. Returns `None` for an empty listing. Unusual folder
/// layouts can defeat it; an explicit per-widget path narrows the needle.
pub fn select_disk_index(disks: &[(&str, &str)], needle: &DiskNeedle) -> Option<usize> {
    if disks.is_empty() {
        return None;
    }

    let wanted_path = trim_path(needle.path);
    let matched = disks.iter().position(|(path, label)| {
        (!wanted_path.is_empty() && trim_path(path) == wanted_path)
            || (!needle.label.is_empty() && label.eq_ignore_ascii_case(needle.label))
    });

    Some(match matched {
        Some(index) => index,
        None if needle.fallback_index < disks.len() => needle.fallback_index,
        None => 0,
    })
}

fn trim_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() && path.starts_with('/') {
        "/"
    } else {
        trimmed
    }
}

pub fn uptime_days(seconds: u64) -> u64 {
    seconds / SECS_PER_DAY
}

/// Compact uptime: `12d`, or `5h` under a day
pub fn short_uptime_display(seconds: u64) -> String {
    let days = uptime_days(seconds);
    if days > 0 {
        format!("{}d", days)
    } else {
        format!("{}h", seconds / SECS_PER_HOUR)
    }
}

/// Two-unit uptime: `3d 4h`, `4h 12m` or `12m`
pub fn long_uptime_display(seconds: u64) -> String {
    let days = uptime_days(seconds);
    let hours = (seconds % SECS_PER_DAY) / SECS_PER_HOUR;
    let minutes = (seconds % SECS_PER_HOUR) / 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

//! Status Tool
//!
//! Runtime status of the feeding service.

use serde::Serialize;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::{sample_feed_source, BuildInfo};
use crate::config::Settings;

/// Usage guide for AI assistants
pub const FEEDING_INSTRUCTIONS: &str = r#"
# Puppy Feeding Calculator Instructions

Computes the recommended daily food amount for a growing puppy from a feed
manufacturer's feeding chart (body weight x age grid).

## Feed Charts

A chart is a JSON object:

```json
{
  "name": "Brand Puppy Formula",
  "cupGrams": 110,
  "axes": {
    "weight": { "unit": "kg", "values": [5, 10, 20] },
    "age":    { "unit": "months", "values": [2, 4, 6] }
  },
  "grid": {
    "unit": "g/day",
    "values": [[120, 200, 330], [140, 240, 400], [130, 230, 390]]
  }
}
```

- `grid.values[age_index][weight_index]`, one row per age breakpoint
- Weight units: `kg`, `lb`
- Age units: `days`, `weeks`, `months` (1 month = 30.4375 days)
- Value units: `g/day`, `oz/day`, `cup/day` (requires `cupGrams`)
- Use `null` for cells the manufacturer leaves empty
- Both axes must be strictly ascending

## Workflow

1. `normalize_feed` to validate a chart before relying on it
2. `compute_daily` with the chart, the puppy's weight and either `age_days`
   or `birth_date` (YYYY-MM-DD)
3. Report `grams_per_day`, `portions_per_day` and `grams_per_portion`

`sample_feed` returns a bundled example chart. `display_feed` shows a chart in
the units it was printed in.

## Diagnoses

Rejected charts or queries come back as `{"error": {"code", "message", "meta"}}`:

| Code | Meaning |
|------|---------|
| INVALID_FEED | Chart object or its axes/grid are missing |
| INVALID_AXIS_VALUES | Unknown axis unit, empty axis, or not strictly ascending |
| MISSING_CUP_GRAMS | `cup/day` chart without a positive `cupGrams` |
| UNSUPPORTED_VALUE_UNIT | Grid unit is not g/day, oz/day or cup/day |
| MATRIX_DIM_MISMATCH | Grid shape does not match the axes |
| NON_POSITIVE_VALUES | A grid value is zero or negative |
| OUT_OF_RANGE | Weight or age outside the chart (`meta` has the bounds) |
| MISSING_DATA | A required cell is empty (`meta.cells` lists them) |

Charts are never extrapolated. If a query is out of range, tell the user the
chart's bounds rather than guessing.
"#;

#[derive(Debug, Serialize)]
pub struct FeedStatus {
    pub build_timestamp: &'static str,
    pub version: &'static str,
    pub settings: Settings,
    pub sample_feed_source: String,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

pub struct StatusTracker {
    start_time: Instant,
    settings: Settings,
}

impl StatusTracker {
    pub fn new(settings: Settings) -> Self {
        Self {
            start_time: Instant::now(),
            settings,
        }
    }

    pub fn get_status(&self) -> FeedStatus {
        let build_info = BuildInfo::current();

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        FeedStatus {
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            sample_feed_source: sample_feed_source(&self.settings, &build_info),
            settings: self.settings.clone(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

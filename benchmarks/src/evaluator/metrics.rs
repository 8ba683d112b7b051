use crate::executor::LatencySample;

const MICROS_PER_MILLI: i64 = 1000;

/// Final latency statistics of a run, in microseconds.
///
/// A run with no successful queries finalizes to all zeros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateStats {
    pub count: u64,
    pub total_micros: i64,
    pub min_micros: i64,
    pub max_micros: i64,
    pub mean_micros: i64,
    pub median_micros: i64,
}

impl AggregateStats {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn render_summary(&self) -> String {
        format!(
            "\n###########################\n\
             Number of queries: {}\n\
             Total query time:  {}ms\n\
             Min query time:    {}ms\n\
             Max query time:    {}ms\n\
             Mean query time:   {}ms\n\
             Median query time: {}ms\n",
            self.count,
            to_millis(self.total_micros),
            to_millis(self.min_micros),
            to_millis(self.max_micros),
            to_millis(self.mean_micros),
            to_millis(self.median_micros),
        )
    }

    pub fn print_summary(&self) {
        print!("{}", self.render_summary());
    }
}

fn to_millis(micros: i64) -> i64 {
    micros / MICROS_PER_MILLI
}

/// Running count/total/min/max plus every sample for the final median.
#[derive(Debug, Clone)]
pub struct StatsAccumulator {
    count: u64,
    total_micros: i64,
    min_micros: i64,
    max_micros: i64,
    samples: Vec<i64>,
}

impl Default for StatsAccumulator {
    fn default() -> Self {
        Self {
            count: 0,
            total_micros: 0,
            min_micros: i64::MAX,
            max_micros: i64::MIN,
            samples: Vec::new(),
        }
    }
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn record(&mut self, sample: LatencySample) {
        let micros = sample.micros;

        self.count += 1;
        self.total_micros += micros;
        // Independent comparisons: a sample can be both the new min and max.
        if micros < self.min_micros {
            self.min_micros = micros;
        }
        if micros > self.max_micros {
            self.max_micros = micros;
        }
        self.samples.push(micros);
    }

    pub fn finalize(mut self) -> AggregateStats {
        if self.count == 0 {
            return AggregateStats::default();
        }

        self.samples.sort_unstable();

        AggregateStats {
            count: self.count,
            total_micros: self.total_micros,
            min_micros: self.min_micros,
            max_micros: self.max_micros,
            mean_micros: self.total_micros / self.count as i64,
            median_micros: median_of_sorted(&self.samples),
        }
    }
}

/// Median of a non-empty ascending slice; the two central values are
/// averaged with integer truncation when the length is even.
fn median_of_sorted(sorted: &[i64]) -> i64 {
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2
    } else {
        sorted[n / 2]
    }
}

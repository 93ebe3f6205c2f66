//! StatsD line rendering shared by the UDP and TCP clients.
//!
//! `<prefix>.<stat>:<value>|<type>[|@<rate>]`, one metric per line.

use std::time::Duration;

use super::StatsClient;

/// Where rendered lines go. Multi-line payloads are `\n`-joined.
pub trait Sink: Send + Sync {
    fn send(&self, payload: &str);
}

/// A [`StatsClient`] that renders StatsD lines and hands them to a sink.
pub struct LineClient<S> {
    prefix: Option<String>,
    sink: S,
}

impl<S: Sink> LineClient<S> {
    pub fn new(prefix: Option<String>, sink: S) -> Self {
        let prefix = prefix.filter(|p| !p.is_empty());
        Self { prefix, sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn name(&self, stat: &str) -> String {
        match &self.prefix {
            Some(p) => format!("{p}.{stat}"),
            None => stat.to_string(),
        }
    }

    fn send_stat(&self, stat: &str, value: &str, rate: f64) {
        if let Some(line) = render(&self.name(stat), value, rate, fastrand::f64()) {
            self.sink.send(&line);
        }
    }
}

impl<S: Sink> StatsClient for LineClient<S> {
    fn increment(&self, stat: &str, count: i64, rate: f64) {
        self.send_stat(stat, &format!("{count}|c"), rate);
    }

    fn gauge(&self, stat: &str, value: f64, rate: f64, delta: bool) {
        if value < 0.0 && !delta {
            // Negative absolute gauges need a reset to zero first.
            if !sampled(rate, fastrand::f64()) {
                return;
            }
            let name = self.name(stat);
            self.sink.send(&format!("{name}:0|g\n{name}:{value}|g"));
            return;
        }
        let value = if delta { format!("{value:+}|g") } else { format!("{value}|g") };
        self.send_stat(stat, &value, rate);
    }

    fn set(&self, stat: &str, value: &str, rate: f64) {
        self.send_stat(stat, &format!("{value}|s"), rate);
    }

    fn timing(&self, stat: &str, delta: Duration, rate: f64) {
        let ms = delta.as_secs_f64() * 1000.0;
        self.send_stat(stat, &format!("{ms:.6}|ms"), rate);
    }
}

/// Rates of 1 or more always send; below 1 a sample passes with probability `rate`.
pub(crate) fn sampled(rate: f64, roll: f64) -> bool {
    rate >= 1.0 || roll < rate
}

/// Render one line, or `None` if the sample was dropped by `roll`.
pub fn render(name: &str, value: &str, rate: f64, roll: f64) -> Option<String> {
    if !sampled(rate, roll) {
        return None;
    }
    if rate < 1.0 {
        Some(format!("{name}:{value}|@{rate}"))
    } else {
        Some(format!("{name}:{value}"))
    }
}

/// Pack lines into payloads of at most `max` bytes. A single line longer than
/// `max` can never fit and is dropped.
pub fn pack(payload: &str, max: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = String::new();
    for line in payload.split('\n').filter(|l| !l.is_empty()) {
        if line.len() > max {
            tracing::debug!(len = line.len(), max, "statsd line over maxudpsize dropped");
            continue;
        }
        if !cur.is_empty() && cur.len() + 1 + line.len() > max {
            out.push(std::mem::take(&mut cur));
        }
        if !cur.is_empty() {
            cur.push('\n');
        }
        cur.push_str(line);
    }
    if !cur.is_empty() {
        out.push(cur);
    }
    out
}

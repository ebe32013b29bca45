use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    ingest_requests: AtomicU64,
    ingest_transactions: AtomicU64,
    ingest_errors: AtomicU64,
    score_requests: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    findings: AtomicU64,
    sweep_runs: AtomicU64,
    sweep_merchant_errors: AtomicU64,
}

impl Metrics {
    pub fn record_ingest(&self, transaction_count: usize) {
        self.ingest_requests.fetch_add(1, Ordering::Relaxed);
        self.ingest_transactions
            .fetch_add(transaction_count as u64, Ordering::Relaxed);
    }

    pub fn record_ingest_error(&self) {
        self.ingest_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_score_request(&self) {
        self.score_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_findings(&self, count: usize) {
        self.findings.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_sweep_run(&self) {
        self.sweep_runs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sweep_merchant_error(&self) {
        self.sweep_merchant_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self) -> String {
        let ingest_requests = self.ingest_requests.load(Ordering::Relaxed);
        let ingest_transactions = self.ingest_transactions.load(Ordering::Relaxed);
        let ingest_errors = self.ingest_errors.load(Ordering::Relaxed);
        let score_requests = self.score_requests.load(Ordering::Relaxed);
        let cache_hits = self.cache_hits.load(Ordering::Relaxed);
        let cache_misses = self.cache_misses.load(Ordering::Relaxed);
        let findings = self.findings.load(Ordering::Relaxed);
        let sweep_runs = self.sweep_runs.load(Ordering::Relaxed);
        let sweep_merchant_errors = self.sweep_merchant_errors.load(Ordering::Relaxed);

        format!(
            "# TYPE riskline_ingest_requests_total counter\n\
riskline_ingest_requests_total {}\n\
# TYPE riskline_ingest_transactions_total counter\n\
riskline_ingest_transactions_total {}\n\
# TYPE riskline_ingest_errors_total counter\n\
riskline_ingest_errors_total {}\n\
# TYPE riskline_score_requests_total counter\n\
riskline_score_requests_total {}\n\
# TYPE riskline_cache_hits_total counter\n\
riskline_cache_hits_total {}\n\
# TYPE riskline_cache_misses_total counter\n\
riskline_cache_misses_total {}\n\
# TYPE riskline_findings_total counter\n\
riskline_findings_total {}\n\
# TYPE riskline_sweep_runs_total counter\n\
riskline_sweep_runs_total {}\n\
# TYPE riskline_sweep_merchant_errors_total counter\n\
riskline_sweep_merchant_errors_total {}\n",
            ingest_requests,
            ingest_transactions,
            ingest_errors,
            score_requests,
            cache_hits,
            cache_misses,
            findings,
            sweep_runs,
            sweep_merchant_errors
        )
    }
}

//! Replay application.
//!
//! Reads one JSON-encoded `TradingState` per line, runs the strategy, and
//! writes one JSON line of orders per tick:
//!
//! ```text
//! {"timestamp":200,"orders":{"PEARLS":[{"symbol":"PEARLS","price":"9997","quantity":9}, ...]}}
//! ```

use std::future::Future;

use quoter_core::{Order, Product, Timestamp, TradingState};
use quoter_strategy::{TickOrders, Trader};
use quoter_telemetry::Metrics;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

/// One line of output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickOutput {
    pub timestamp: Timestamp,
    pub orders: TickOrders,
}

/// Totals for a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub rejected: u64,
    pub orders: u64,
    pub total_pnl: Decimal,
    /// Stopped by the shutdown signal rather than end of input.
    pub interrupted: bool,
}

/// Main application.
pub struct Application {
    config: AppConfig,
    trader: Trader,
    summary: RunSummary,
}

impl Application {
    /// Create a new application. Fails on an invalid strategy config.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let trader = Trader::new(config.strategy.clone())?;
        Ok(Self {
            config,
            trader,
            summary: RunSummary::default(),
        })
    }

    /// Run against files (`-` = stdin / `None` = stdout) until end of input or Ctrl-C.
    pub async fn run(mut self, input: &str, output: Option<&str>) -> AppResult<RunSummary> {
        let reader: Box<dyn AsyncBufRead + Unpin + Send> = if input == "-" {
            Box::new(BufReader::new(tokio::io::stdin()))
        } else {
            Box::new(BufReader::new(tokio::fs::File::open(input).await?))
        };
        let mut writer: Box<dyn AsyncWrite + Unpin + Send> = match output {
            Some(path) => Box::new(tokio::fs::File::create(path).await?),
            None => Box::new(tokio::io::stdout()),
        };

        info!(input, output = output.unwrap_or("-"), "Starting replay");
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(?e, "Failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        };
        let summary = self.run_stream(reader, &mut writer, shutdown).await?;
        self.write_metrics().await?;
        Ok(summary)
    }

    /// Drive the strategy over a line stream until EOF or `shutdown` resolves.
    pub async fn run_stream<R, W, F>(
        &mut self,
        reader: R,
        writer: &mut W,
        shutdown: F,
    ) -> AppResult<RunSummary>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
        F: Future<Output = ()>,
    {
        let mut lines = reader.lines();
        let mut line_no = 0u64;
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    line_no += 1;
                    if line.trim().is_empty() {
                        continue;
                    }
                    let Some(output) = self.process_line(line_no, &line)? else {
                        continue;
                    };
                    let mut encoded = serde_json::to_vec(&output)?;
                    encoded.push(b'\n');
                    writer.write_all(&encoded).await?;
                    writer.flush().await?;
                }
                _ = &mut shutdown => {
                    info!(line = line_no, "Shutdown requested");
                    self.summary.interrupted = true;
                    break;
                }
            }
        }

        info!(
            ticks = self.summary.ticks,
            rejected = self.summary.rejected,
            orders = self.summary.orders,
            total_pnl = %self.summary.total_pnl,
            "Replay finished"
        );
        Ok(self.summary.clone())
    }

    /// Decode and process one input line.
    ///
    /// Returns `None` for a skipped malformed line.
    pub fn process_line(&mut self, line_no: u64, line: &str) -> AppResult<Option<TickOutput>> {
        match TradingState::from_json(line) {
            Ok(state) => Ok(Some(self.process_tick(&state))),
            Err(source) if self.config.harness.skip_malformed => {
                warn!(line = line_no, error = %source, "Skipping malformed tick");
                Metrics::tick_rejected();
                self.summary.rejected += 1;
                Ok(None)
            }
            Err(source) => Err(AppError::MalformedTick {
                line: line_no,
                source,
            }),
        }
    }

    /// Run the strategy on one tick and record diagnostics.
    pub fn process_tick(&mut self, state: &TradingState) -> TickOutput {
        let orders = self.trader.run(state);
        Metrics::fills_applied(self.trader.last_fills() as u64);

        self.record_orders(&orders);
        self.record_snapshot(state);

        self.summary.ticks += 1;
        Metrics::tick_processed();
        let interval = self.config.telemetry.summary_interval;
        if interval > 0 && self.summary.ticks % interval == 0 {
            info!(
                timestamp = state.timestamp,
                ticks = self.summary.ticks,
                total_pnl = %self.summary.total_pnl,
                total_cash = %self.trader.ledger().total_cash(),
                "PnL summary"
            );
        }

        TickOutput {
            timestamp: state.timestamp,
            orders,
        }
    }

    fn record_orders(&mut self, orders: &TickOrders) {
        for order in orders.values().flatten() {
            if let Some(side) = order.side() {
                Metrics::order_emitted(order.symbol, side);
            }
            self.summary.orders += 1;
        }
    }

    fn record_snapshot(&mut self, state: &TradingState) {
        for snap in self.trader.snapshot(state) {
            if let Some(fair) = snap.fair {
                Metrics::fair_value(snap.product, to_f64(fair.inner()));
            }
            if let Some(mid) = snap.smoothed_mid {
                Metrics::smoothed_mid(snap.product, to_f64(mid.inner()));
            }
            Metrics::position(snap.product, snap.position);
            Metrics::cash(snap.product, to_f64(snap.cash));
            if let Some(pnl) = snap.pnl {
                Metrics::pnl(snap.product, to_f64(pnl));
            }
            debug!(
                product = %snap.product,
                position = snap.position,
                cash = %snap.cash,
                own_volume = snap.own_volume,
                market_volume = snap.market_volume,
                pnl = ?snap.pnl,
                "PnL"
            );
        }
        self.summary.total_pnl = self.trader.total_pnl(state);
    }

    async fn write_metrics(&self) -> AppResult<()> {
        let Some(path) = &self.config.telemetry.metrics_path else {
            return Ok(());
        };
        let text = Metrics::gather_text()?;
        tokio::fs::write(path, text).await?;
        info!(path = %path, "Metrics written");
        Ok(())
    }

    pub fn trader(&self) -> &Trader {
        &self.trader
    }

    /// Orders for `product` from a tick output, empty if none.
    pub fn orders_for(output: &TickOutput, product: Product) -> &[Order] {
        output.orders.get(&product).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

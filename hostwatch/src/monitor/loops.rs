use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use super::ResourceMonitor;

impl ResourceMonitor {
    /// Log a combined disk/memory/CPU line every diagnostic interval until the
    /// context's stop flag is raised.
    #[instrument(name = "diagnostic_loop", skip(self))]
    pub async fn run(&self) {
        let stop_flag = self.context.stop_flag().clone();
        let interval = self.settings.diagnostic_interval();
        info!("Diagnostic loop started, interval {:?}", interval);

        while !stop_flag.is_stopped() {
            self.context.debug(&self.diagnostic_line());

            if !stop_flag.sleep(interval).await {
                break;
            }
        }

        debug!("Diagnostic loop stopped");
    }

    /// Check disk and memory against their thresholds every warning interval
    /// until the context's stop flag is raised.
    #[instrument(name = "utilization_loop", skip(self))]
    pub async fn run_resource_utilization_monitor(&self) {
        let stop_flag = self.context.stop_flag().clone();
        let interval = self.settings.warning_interval();
        info!("Resource utilization monitor started, interval {:?}", interval);

        while !stop_flag.is_stopped() {
            let disk = self.check_disk_utilization();
            let memory = self.check_memory_utilization();
            debug!("Utilization check: disk {:?}, memory {:?}", disk, memory);

            if !stop_flag.sleep(interval).await {
                break;
            }
        }

        debug!("Resource utilization monitor stopped");
    }

    /// Spawn both loops as background tasks.
    pub fn spawn(self: Arc<Self>) -> (JoinHandle<()>, JoinHandle<()>) {
        let diagnostics = {
            let monitor = self.clone();
            tokio::spawn(async move { monitor.run().await })
        };
        let utilization = tokio::spawn(async move { self.run_resource_utilization_monitor().await });

        (diagnostics, utilization)
    }
}

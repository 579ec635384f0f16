//! Terminal status display.

use std::io::{self, Write};

use tracing::warn;

use er_sim::{DischargeRecord, ErSim, RoundSnapshot, SimObserver, SinkResult};

/// Prints slot occupancy after every round and a line per discharge.
pub struct StatusPrinter<W: Write> {
    out: W,
}

impl<W: Write> StatusPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn print_round(&mut self, snap: &RoundSnapshot) -> io::Result<()> {
        writeln!(
            self.out,
            "── {} ── in treatment {}  waiting {}  discharged {} (total {})  billed {}",
            snap.round,
            snap.in_treatment(),
            snap.waiting,
            snap.discharged_this_round,
            snap.discharged_total,
            snap.billed_total,
        )?;
        for doc in snap.doctors.iter().filter(|d| !d.patients.is_empty()) {
            let occupants: Vec<String> = doc
                .patients
                .iter()
                .map(|p| format!("#{} sev {} visits {}", p.id.0, p.severity, p.visits))
                .collect();
            writeln!(self.out, "  doctor {:>2} [{}/{}]  {}", doc.doctor, doc.patients.len(), doc.capacity, occupants.join(" | "))?;
        }
        Ok(())
    }
}

impl<W: Write> SimObserver for StatusPrinter<W> {
    fn on_discharge(&mut self, record: &DischargeRecord) -> SinkResult {
        writeln!(
            self.out,
            "  discharged #{} {} after {} visits, billed {}",
            record.patient_id.0, record.name, record.visits, record.total_billed,
        )?;
        Ok(())
    }

    fn on_round_end(&mut self, snapshot: &RoundSnapshot) {
        if let Err(e) = self.print_round(snapshot) {
            warn!(error = %e, "could not print round status");
        }
    }
}

/// Final per-account billing table.
pub fn print_billing<W: Write>(out: &mut W, sim: &ErSim) -> io::Result<()> {
    writeln!(out, "{:<12} {:>10}", "Billing key", "Total")?;
    writeln!(out, "{}", "-".repeat(23))?;
    for (key, total) in sim.ctx.billing.accounts() {
        writeln!(out, "{:<12} {:>10}", key.0, total)?;
    }
    writeln!(out, "{:<12} {:>10}", "all", sim.ctx.billing.grand_total())?;
    Ok(())
}

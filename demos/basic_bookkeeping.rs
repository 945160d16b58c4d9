//! Basic bookkeeping run: chart, period, batches, balances

use bookkeeping_core::report::Text;
use bookkeeping_core::{AccountRegistry, BalanceReport, LedgerEngine, Period, ReportFormat};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("🧾 Bookkeeping Core - Basic Ledger Example\n");

    // 1. Load the chart of accounts
    println!("📊 Loading Chart of Accounts...");
    let registry = AccountRegistry::load(
        "1000;Kasse;status;INGEN\n\
         1100;Bank;status;INGEN\n\
         2000;Egenkapital;status;INGEN\n\
         3000;Skyldig moms;status;INGEN\n\
         3100;Tilgodehavende moms;status;INGEN\n\
         5000;Salg af varer;drift;UDG\n\
         6000;Varekøb;drift;INDG\n\
         6100;Husleje;drift;INGEN\n\
         9000;Resultat i alt;sum:5000-8999;INGEN\n",
    )?;
    for account in registry.all() {
        println!(
            "  ✓ {} - {} ({}, {})",
            account.number, account.name, account.kind, account.vat_code
        );
    }
    println!();

    // 2. Load the accounting period
    println!("📅 Loading Accounting Period...");
    let period = Period::load("Demo ApS;01-01-2025;31-12-2025;3100;3000;0.25\n")?;
    println!(
        "  ✓ {} from {} to {}, VAT rate {}",
        period.name, period.from, period.to, period.vat_rate
    );
    println!();

    // 3. Ingest batches
    println!("💰 Ingesting Transaction Batches...\n");
    let mut engine = LedgerEngine::new(registry, period);

    // Opening balances carried in from last year
    engine.ingest_batch(
        "Dato;Bilagsnummer;Konto;Tekst;Beløb;Modkonto\n\
         ;-1;1000;Saldo ved årets start;2500;2000\n\
         ;-1;1100;Saldo ved årets start;47500;2000\n",
        "00-primo",
    )?;
    println!("  ✓ Ingested: opening balances");

    // A month of trading
    engine.ingest_batch(
        "Dato;Bilagsnummer;Konto;Tekst;Beløb;Modkonto\n\
         05-01-2025;1;5000;Kontant salg;-1250;1000\n\
         12-01-2025;2;6000;Indkøb af varer;625;1100\n\
         31-01-2025;3;6100;Husleje januar;8000;1100\n",
        "01-januar",
    )?;
    println!("  ✓ Ingested: January trading");

    // 4. Finalize and generate VAT postings
    println!("\n🧮 Finalizing Ledger (VAT generation)...");
    let postings = engine.finalize()?;
    println!("  ✓ Final posting count: {}", postings.len());

    // 5. Render the balance report
    println!("\n📈 Balance Report:\n");
    let report = BalanceReport::from_engine(&engine);
    Text::write_balances(std::io::stdout().lock(), &report)?;

    println!("\n🎉 Example completed successfully!");
    Ok(())
}

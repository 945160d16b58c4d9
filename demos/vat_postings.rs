//! VAT extraction examples: the arithmetic and the generated postings

use bigdecimal::BigDecimal;
use bookkeeping_core::{extract_vat, AccountRegistry, LedgerEngine, Period, PostingOrigin};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("🧾 Bookkeeping Core - VAT Posting Examples\n");

    // 1. Extracting VAT from gross amounts
    println!("📊 VAT Included in Gross Amounts (rate 25%):");
    let rate: BigDecimal = "0.25".parse()?;
    let gross_amounts = ["1250", "999.95", "-1000", "0.01"];

    for gross in gross_amounts {
        let amount: BigDecimal = gross.parse()?;
        let vat = extract_vat(&amount, &rate);
        println!("  Gross {:>8}  →  VAT portion {}", gross, vat);
    }
    println!();

    // 2. A ledger run that generates VAT postings
    println!("💰 Generated Postings on Finalize:");
    let registry = AccountRegistry::load(
        "1000;Kasse;status;INGEN\n\
         3000;Skyldig moms;status;INGEN\n\
         3100;Tilgodehavende moms;status;INGEN\n\
         5000;Salg af varer;drift;UDG\n\
         6000;Varekøb;drift;INDG\n",
    )?;
    let period = Period::load("Momsdemo ApS;01-01-2025;31-12-2025;3100;3000;0.25\n")?;

    let mut engine = LedgerEngine::new(registry, period);
    engine.ingest_batch(
        "Dato;Bilagsnummer;Konto;Tekst;Beløb;Modkonto\n\
         10-01-2025;1;5000;Salg inkl. moms;-1250;1000\n\
         15-01-2025;2;6000;Varekøb inkl. moms;625;1000\n",
        "kladde1",
    )?;
    engine.finalize()?;

    for posting in engine.postings() {
        let marker = if posting.origin == PostingOrigin::VatGenerated {
            "moms"
        } else {
            "    "
        };
        println!(
            "  [{}] {}  bilag {:>2}  konto {:>5}  {:>9}  {}",
            marker,
            posting.date,
            posting.voucher,
            posting.account,
            posting.amount.to_string(),
            posting.text
        );
    }
    println!();

    // 3. Resulting balances
    println!("📈 Balances After VAT Generation:");
    for account in [5000, 3000, 6000, 3100, 1000] {
        println!("  {:>5}: {:>9}", account, engine.balance_of(account).to_string());
    }

    println!("\n🎉 Example completed successfully!");
    Ok(())
}

// This is my main entry point for the registry CLI application
// I'm importing all the core components I built for this registry
use carbon_registry::core::monetary::conversions::format_units;
use carbon_registry::{
    Command, CreditLedger, Marketplace, NativeBank, Opt, ProjectRegistry, RegistryStore,
    SensorDataLog,
};
use clap::Parser;
use log::{error, LevelFilter};
use std::process;

fn main() {
    // I initialize logging so I can see what's happening in my registry
    // Setting it to Info level gives me enough detail without being too verbose
    env_logger::builder().filter_level(LevelFilter::Info).init();

    // I parse the command line arguments using clap - this gives me a nice CLI interface
    let opt = Opt::parse();

    // I run the actual command and handle any errors that might occur
    // If something goes wrong, I log the error and exit with code 1
    if let Err(e) = run_command(opt.command) {
        error!("Error: {e}");
        process::exit(1);
    }
}

// This is where I handle all the different CLI commands
// Each command corresponds to one registry operation
fn run_command(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        // When I want to initialize a brand new registry with a fixed admin
        Command::Createregistry { admin } => {
            let store = RegistryStore::create(&admin)?;
            println!(
                "Registry ready at {}, admin: {}",
                store.get_db_path().display(),
                store.admin_address()?
            );
        }
        Command::RegisterProject {
            caller,
            name,
            location,
            owner,
            area,
        } => {
            let store = RegistryStore::open()?;
            let projects = ProjectRegistry::new(store)?;
            let project_id = projects.register_project(&caller, &name, &location, &owner, area)?;
            println!("Registered project {project_id}");
        }
        Command::DeactivateProject { caller, project_id } => {
            let store = RegistryStore::open()?;
            let projects = ProjectRegistry::new(store)?;
            projects.deactivate_project(&caller, project_id)?;
            println!("Deactivated project {project_id}");
        }
        Command::ShowProject { project_id } => {
            let store = RegistryStore::open()?;
            let projects = ProjectRegistry::new(store)?;
            let project = projects.get_project(project_id)?;
            println!("{}", serde_json::to_string_pretty(&project)?);
        }
        Command::ProjectStats => {
            let store = RegistryStore::open()?;
            let projects = ProjectRegistry::new(store.clone())?;
            let sensors = SensorDataLog::new(store.clone())?;
            let market = Marketplace::new(store)?;
            println!("Total projects:       {}", projects.total_projects()?);
            println!("Total sensor records: {}", sensors.total_sensor_data()?);
            println!("Credits issued:       {}", projects.total_credits_issued()?);
            println!(
                "Price per credit:     {}",
                format_units(market.credit_price()?)
            );
        }
        Command::RecordSensor {
            caller,
            project_id,
            co2,
            temperature,
            humidity,
            sensor_id,
        } => {
            let store = RegistryStore::open()?;
            let sensors = SensorDataLog::new(store)?;
            let reading_id = sensors
                .record_sensor_data(&caller, project_id, co2, temperature, humidity, &sensor_id)?;
            println!("Recorded reading {reading_id}");
        }
        Command::ShowReading { reading_id } => {
            let store = RegistryStore::open()?;
            let sensors = SensorDataLog::new(store)?;
            let reading = sensors.get_sensor_data(reading_id)?;
            println!("{}", serde_json::to_string_pretty(&reading)?);
        }
        Command::ListReadings { project_id } => {
            let store = RegistryStore::open()?;
            let sensors = SensorDataLog::new(store)?;
            for reading_id in sensors.project_sensor_data_ids(project_id)? {
                println!("{reading_id}");
            }
        }
        Command::IssueCredits {
            caller,
            project_id,
            amount,
        } => {
            let store = RegistryStore::open()?;
            let ledger = CreditLedger::new(store)?;
            ledger.issue_credits(&caller, project_id, amount)?;
            println!("Issued {amount} credits to project {project_id}");
        }
        Command::TransferCredits { from, to, amount } => {
            let store = RegistryStore::open()?;
            let ledger = CreditLedger::new(store)?;
            ledger.transfer_credits(&from, &to, amount)?;
            println!("Transferred {amount} credits from {from} to {to}");
        }
        Command::UseCredits { holder, amount } => {
            let store = RegistryStore::open()?;
            let ledger = CreditLedger::new(store)?;
            ledger.use_credits(&holder, amount)?;
            println!("Retired {amount} credits for {holder}");
        }
        // When a buyer purchases credits with attached value.
        // I collect the attached payment first, and hand it back in full
        // if the purchase is rejected - the substrate's job in the original
        Command::BuyCredits {
            buyer,
            seller,
            amount,
            paid,
        } => {
            let store = RegistryStore::open()?;
            let market = Marketplace::new(store.clone())?;
            let bank = NativeBank::new(store);
            bank.withdraw(&buyer, paid)?;
            match market.buy_credits(&buyer, &seller, amount, paid, &bank) {
                Ok(receipt) => {
                    println!(
                        "Bought {amount} credits for {}, refunded {}",
                        format_units(receipt.cost),
                        format_units(receipt.refund)
                    );
                }
                Err(e) => {
                    bank.deposit(&buyer, paid)?;
                    return Err(e.into());
                }
            }
        }
        Command::GetBalance { holder } => {
            let store = RegistryStore::open()?;
            let ledger = CreditLedger::new(store)?;
            let balance = ledger.get_credit_balance(&holder)?;
            println!("{}", serde_json::to_string_pretty(&balance)?);
        }
        Command::SetPrice { caller, price } => {
            let store = RegistryStore::open()?;
            let market = Marketplace::new(store)?;
            market.set_credit_price(&caller, price)?;
            println!("Price per credit set to {}", format_units(price));
        }
        Command::Deposit { address, amount } => {
            let store = RegistryStore::open()?;
            let bank = NativeBank::new(store);
            bank.deposit(&address, amount)?;
            println!("Deposited {} to {address}", format_units(amount));
        }
        Command::BankBalance { address } => {
            let store = RegistryStore::open()?;
            let bank = NativeBank::new(store);
            println!("{}", format_units(bank.balance_of(&address)?));
        }
    }
    Ok(())
}

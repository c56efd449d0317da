use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "carbon-registry")]
pub struct Opt {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(
        name = "createregistry",
        about = "Initialize a new registry with a fixed admin"
    )]
    Createregistry {
        #[arg(help = "The address that becomes the permanent admin")]
        admin: String,
    },
    #[command(name = "registerproject", about = "Register a conservation project")]
    RegisterProject {
        #[arg(help = "Calling address (must be admin)")]
        caller: String,
        #[arg(help = "Project name")]
        name: String,
        #[arg(help = "Project location")]
        location: String,
        #[arg(help = "Project owner address (receives issued credits)")]
        owner: String,
        #[arg(help = "Project area in hectares")]
        area: u64,
    },
    #[command(name = "deactivateproject", about = "Deactivate a project permanently")]
    DeactivateProject {
        #[arg(help = "Calling address (must be admin)")]
        caller: String,
        #[arg(help = "Project id")]
        project_id: u64,
    },
    #[command(name = "showproject", about = "Print a project record")]
    ShowProject {
        #[arg(help = "Project id")]
        project_id: u64,
    },
    #[command(name = "projectstats", about = "Print registry totals")]
    ProjectStats,
    #[command(name = "recordsensor", about = "Record an IoT sensor reading")]
    RecordSensor {
        #[arg(help = "Calling address (must be admin)")]
        caller: String,
        #[arg(help = "Project id the reading belongs to")]
        project_id: u64,
        #[arg(help = "CO2 absorbed in kg")]
        co2: i64,
        #[arg(help = "Temperature in centi-degrees C (28.50C -> 2850)")]
        temperature: i64,
        #[arg(help = "Humidity in centi-percent (75% -> 7500)")]
        humidity: i64,
        #[arg(help = "Sensor identifier")]
        sensor_id: String,
    },
    #[command(name = "showreading", about = "Print a sensor reading")]
    ShowReading {
        #[arg(help = "Reading id")]
        reading_id: u64,
    },
    #[command(name = "listreadings", about = "List reading ids for a project")]
    ListReadings {
        #[arg(help = "Project id")]
        project_id: u64,
    },
    #[command(name = "issuecredits", about = "Mint credits to a project's owner")]
    IssueCredits {
        #[arg(help = "Calling address (must be admin)")]
        caller: String,
        #[arg(help = "Project id")]
        project_id: u64,
        #[arg(help = "Credits to issue")]
        amount: u64,
    },
    #[command(name = "transfercredits", about = "Transfer credits between holders")]
    TransferCredits {
        #[arg(help = "Sending holder address")]
        from: String,
        #[arg(help = "Receiving holder address")]
        to: String,
        #[arg(help = "Credits to transfer")]
        amount: u64,
    },
    #[command(name = "usecredits", about = "Retire credits for offsetting")]
    UseCredits {
        #[arg(help = "Holder address")]
        holder: String,
        #[arg(help = "Credits to retire")]
        amount: u64,
    },
    #[command(name = "buycredits", about = "Buy credits from a seller with attached value")]
    BuyCredits {
        #[arg(help = "Buying address")]
        buyer: String,
        #[arg(help = "Selling holder address")]
        seller: String,
        #[arg(help = "Credits to buy")]
        amount: u64,
        #[arg(help = "Attached payment in native units")]
        paid: u128,
    },
    #[command(name = "getbalance", about = "Print a holder's credit balance")]
    GetBalance {
        #[arg(help = "Holder address")]
        holder: String,
    },
    #[command(name = "setprice", about = "Set the price per credit")]
    SetPrice {
        #[arg(help = "Calling address (must be admin)")]
        caller: String,
        #[arg(help = "New price per credit in native units")]
        price: u128,
    },
    #[command(name = "deposit", about = "Credit a native value account (demo faucet)")]
    Deposit {
        #[arg(help = "Account address")]
        address: String,
        #[arg(help = "Amount in native units")]
        amount: u128,
    },
    #[command(name = "bankbalance", about = "Print a native value account balance")]
    BankBalance {
        #[arg(help = "Account address")]
        address: String,
    },
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "talabia")]
#[command(about = "Command-line client for the Talabia admin API", long_about = None)]
pub struct Args {
    #[arg(
        long = "api-url",
        global = true,
        help = "API base URL (e.g., https://api.talabia.net/api)"
    )]
    pub api_url: Option<String>,

    #[arg(
        long = "session-dir",
        global = true,
        help = "Directory holding the saved session"
    )]
    pub session_dir: Option<PathBuf>,

    #[arg(short = 'v', long = "verbose", global = true, help = "Log requests to stderr")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Sign in with a one-time code sent to a phone number
    Login {
        phone: String,
        #[arg(long, help = "Code already received; skips sending a new one")]
        otp: Option<String>,
    },
    /// Ask for a new one-time code
    ResendOtp { phone: String },
    /// End the current session
    Logout,
    /// Show who is signed in
    Whoami,
    /// Exchange the current tokens for a new pair
    Refresh,
    /// GET a resource
    Get { path: String },
    /// DELETE a resource
    Delete { path: String },
    /// POST a JSON body to a resource
    Post {
        path: String,
        #[arg(long, help = "JSON request body")]
        data: Option<String>,
    },
    /// PUT a JSON body to a resource
    Put {
        path: String,
        #[arg(long, help = "JSON request body")]
        data: Option<String>,
    },
    /// Fetch one page of a list resource
    List {
        resource: String,
        #[arg(long, default_value_t = 0, help = "Offset of the first row")]
        first: u32,
        #[arg(long, default_value_t = 10, help = "Rows per page")]
        rows: u32,
        #[arg(long, help = "Search text")]
        search: Option<String>,
    },
}

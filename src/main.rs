mod amounts;
mod bonus;
mod cli;
mod clock;
mod commission;
mod dates;
mod invoices;
mod penalty;
mod period;
mod projects;
mod vault;
mod warranty;

fn main() {
    cli::run()
}

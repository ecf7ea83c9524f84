use pulsarctl::config::lock::LockError;
use pulsarctl::errors::CurrentContextNotSet;
use pulsarctl::errors::NotFound;
use pulsarctl::run;

fn main() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build();
    let runtime = match runtime {
        Ok(runtime) => runtime,
        Err(error) => {
            eprintln!("Unable to initialise the async runtime: {}", error);
            std::process::exit(1);
        }
    };

    let result = runtime.block_on(run());
    let error = match result {
        Err(error) => error,
        Ok(0) => return,
        Ok(num) => std::process::exit(num),
    };

    // Provide better error messages for cases where we can provide suggestions to the user.
    if let Some(error) = error.downcast_ref::<NotFound>() {
        eprintln!("{}", error);
        eprintln!("Run 'pulsarctl context get' to list the known contexts");
        std::process::exit(1);
    }
    if let Some(error) = error.downcast_ref::<CurrentContextNotSet>() {
        eprintln!("{}", error);
        eprintln!("Select a context with 'pulsarctl context use NAME' or create one with 'pulsarctl context set NAME'");
        std::process::exit(1);
    }
    if let Some(error) = error.downcast_ref::<LockError>() {
        eprintln!("{}", error);
        eprintln!(
            "If no other pulsarctl process is running remove '{}.lock' and try again",
            error.path,
        );
        std::process::exit(1);
    }
    if let Some(error) = error.downcast_ref::<pulsarctl::errors::AlreadyExists>() {
        eprintln!("{}", error);
        std::process::exit(1);
    }
    if let Some(error) = error.downcast_ref::<pulsarctl::errors::EmptyContextName>() {
        eprintln!("{}", error);
        std::process::exit(1);
    }
    if let Some(error) = error.downcast_ref::<pulsarctl::errors::ConnectionInvalid>() {
        eprintln!("{}", error);
        std::process::exit(1);
    }

    // Print the error in detailed format for all other cases.
    eprintln!("{:?}", error);
    std::process::exit(1);
}

use std::process::ExitCode;

use heic_to_jpg::action::cli::process_args;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    match process_args(args) {
        Ok(output) => {
            if output.summary.total == 0 {
                println!("所選目錄中找不到 HEIC 檔案。");
                return ExitCode::SUCCESS;
            }
            log::info!("程式執行完成，輸出目錄：{}", output.output_path.display());
            println!("Conversion completed!");
            println!(
                "{}，輸出位於：{}",
                output.summary.tally_line(),
                output.output_path.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("錯誤：{}", e);
            ExitCode::FAILURE
        }
    }
}

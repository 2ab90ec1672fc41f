use formula_rs::ast::Evaluator;
use formula_rs::plot::GraphBlock;

fn main() {
    pretty_env_logger::init();

    let text = "func=sin(x)*x\nmin=-6\nmax=6\ndivision=12";
    let graph = GraphBlock::parse(text).expect("Failed to read graph block");

    let mut evaluator = Evaluator::new(100);
    match graph.render(&mut evaluator) {
        Ok(samples) => {
            for sample in samples {
                println!("{:>6.2} {:>8.4}", sample.x, sample.y);
            }
        }
        Err(err) => println!("{}", err),
    }
}

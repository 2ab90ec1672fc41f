use formula_rs::ast::Evaluator;

fn main() {
    pretty_env_logger::init();

    let formulas = ["1+2*3", "x^2", "sin(x)", "-pi*x", "asin(2)", "(1+2"];

    let mut evaluator = Evaluator::new(100);
    for formula in formulas {
        match evaluator.evaluate_expression(formula, 2.0) {
            Ok(result) => println!("{} at x = 2: {}", formula, result),
            Err(err) => println!("{}: {}", formula, err),
        }
    }
}

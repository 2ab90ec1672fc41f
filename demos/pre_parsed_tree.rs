use formula_rs::ast::Evaluator;

fn main() {
    pretty_env_logger::init();

    let evaluator = Evaluator::new(100);

    let formula = "x^3 - 2*x + 1";
    let tree = evaluator
        .parse_expression(formula)
        .expect("Failed to parse");
    println!("Tree: {}", tree);

    for x in [-2.0, -1.0, 0.0, 1.0, 2.0] {
        match evaluator.evaluate(&tree, x) {
            Ok(result) => println!("f({}) = {}", x, result),
            Err(err) => println!("Error: {}", err),
        }
    }
}

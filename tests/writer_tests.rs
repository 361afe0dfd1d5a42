use insta::assert_snapshot;
use xjs::document::{CommentType, Object};
use xjs::{parse, write_xjs, Value, WriterOptions};

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite(input: &str) -> String {
        write_xjs(&parse(input).expect("parses"), &WriterOptions::default())
    }

    fn options() -> WriterOptions {
        WriterOptions::default().with_eol("\n")
    }

    #[test]
    fn void_array_emits_bare_commas() {
        let value = parse("[,,,]").expect("parses");
        assert_eq!(write_xjs(&value, &options()), "[,,,]");

        let value = parse("[,,]").expect("parses");
        assert_eq!(write_xjs(&value, &options()), "[,,]");
    }

    #[test]
    fn condensed_array_keeps_one_line() {
        let value = parse("[1,2,3]").expect("parses");
        assert_eq!(write_xjs(&value, &options()), "[ 1, 2, 3 ]");
    }

    #[test]
    fn open_root_formats_members() {
        let out = write_xjs(&parse("a:1,b:two").expect("parses"), &options());
        assert_eq!(out, "a: 1, b: two");
    }

    #[test]
    fn formats_messy_input() {
        let out = write_xjs(
            &parse("{a:1\nb:{\nc:hello world\nd:[1,2]\n}}").expect("parses"),
            &options(),
        );
        assert_snapshot!(out.trim_end(), @r###"
        a: 1
        b: {
          c: hello world
          d: [ 1, 2 ]
        }
        "###);
    }

    #[test]
    fn value_comment_inline_when_lines_between_unset() {
        let _style = xjs::context::scoped_comment_style(xjs::CommentStyle::Block);

        let mut object = Object::new();
        let mut member = Value::implicit("value");
        member.set_comment_text(CommentType::Value, "why");
        object.add("key", member);

        let out = write_xjs(&Value::from(object), &options());
        assert_eq!(out, "key: /* why */ value");
    }

    #[test]
    fn value_comment_moves_below_when_lines_between_is_positive() {
        let out = rewrite("key:\n  // why\n  value\n");
        assert_eq!(out, "key:\n  // why\n  value\n");
    }

    #[test]
    fn implicit_strings_quote_when_ineligible() {
        let mut object = Object::new();
        object.add("comma", Value::implicit("a, b"));
        object.add("brace", Value::implicit("{x"));
        object.add("numberish", Value::implicit("12"));
        object.add("plain", Value::implicit("fine text"));
        let out = write_xjs(&Value::from(object), &options());

        assert_snapshot!(out.trim_end(), @r###"
        comma: a\, b
        brace: "{x"
        numberish: "12"
        plain: fine text
        "###);
    }

    #[test]
    fn implicit_with_newline_promotes_to_multi() {
        let mut object = Object::new();
        object.add("m", Value::implicit("one\ntwo"));
        let out = write_xjs(&Value::from(object), &options());
        assert_eq!(out, "m:\n  '''\n  one\n  two\n  '''");
    }

    #[test]
    fn quotes_disabled_forces_quoting() {
        let value = parse("{key:value}").expect("parses");
        let out = write_xjs(
            &value,
            &options().with_omit_quotes(false).with_omit_root_braces(false),
        );
        assert_eq!(out, "{ \"key\": \"value\" }");
    }

    #[test]
    fn root_braces_can_be_kept() {
        let value = parse("a:1").expect("parses");
        let out = write_xjs(&value, &options().with_omit_root_braces(false));
        assert_eq!(out, "{ a: 1 }");
    }

    #[test]
    fn unformatted_output_is_single_line() {
        let value = parse("a: 1\nb: [1, 2]\nc: {d: x}\n").expect("parses");
        let out = write_xjs(&value, &WriterOptions::unformatted());
        assert_eq!(out, "a:1,b:[1,2],c:{d:x}");
    }

    #[test]
    fn smart_spacing_pads_container_members() {
        let value = parse("a: 1\nobj: {x: 1}\nb: 2\n").expect("parses");
        let out = write_xjs(&value, &options().with_smart_spacing(true));
        assert_eq!(out, "a: 1\n\nobj: { x: 1 }\n\nb: 2\n");
    }

    #[test]
    fn braces_can_open_on_their_own_line() {
        let value = parse("obj: {\n  a: 1\n}\n").expect("parses");
        let out = write_xjs(&value, &options().with_braces_same_line(false));
        assert_eq!(out, "obj:\n{\n  a: 1\n}\n");
    }

    #[test]
    fn min_spacing_forces_blank_lines() {
        let value = parse("a: 1\nb: 2\n").expect("parses");
        let out = write_xjs(&value, &options().with_min_spacing(2));
        assert_eq!(out, "a: 1\n\nb: 2\n");
    }

    #[test]
    fn max_spacing_clamps_blank_runs() {
        let value = parse("a: 1\n\n\n\n\nb: 2\n").expect("parses");
        let out = write_xjs(&value, &options().with_max_spacing(2));
        assert_eq!(out, "a: 1\n\nb: 2\n");
    }

    #[test]
    fn keys_escape_or_quote_as_needed() {
        let mut object = Object::new();
        object.add("with:colon", Value::number(1.0));
        object.add("with\nnewline", Value::number(2.0));
        object.add("spaced key", Value::number(3.0));
        let out = write_xjs(&Value::from(object), &options());

        assert_snapshot!(out.trim_end(), @r###"
        with\:colon: 1
        "with\nnewline": 2
        spaced key: 3
        "###);
    }

    #[test]
    fn single_quoted_strings_keep_their_quotes() {
        let value = parse("s: 'plain'\n").expect("parses");
        assert_eq!(write_xjs(&value, &options()), "s: 'plain'\n");

        let value = parse("s: 'don\\'t'\n").expect("parses");
        assert_eq!(write_xjs(&value, &options()), "s: 'don\\'t'\n");
    }

    #[test]
    fn display_uses_default_options() {
        let value = parse("a:1").expect("parses");
        assert!(value.to_string().contains("a: 1"));
    }
}

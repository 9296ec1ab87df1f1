mod test_file_parsing;
